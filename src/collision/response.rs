use crate::collision::sat::Contact;
use crate::core::BodyHandle;
use crate::math::Vector;

/// Result of a positive narrow-phase test between two bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Response {
    /// The body the response is relative to
    pub a: BodyHandle,

    /// The body `a` was tested against
    pub b: BodyHandle,

    /// Penetration depth along `overlap_n`
    pub overlap: f32,

    /// Unit direction from `a` into `b`
    pub overlap_n: Vector,

    /// Translation that pushes `a` out of `b` when subtracted from `a`'s position
    pub overlap_v: Vector,

    /// `a` lies entirely inside `b`
    pub a_in_b: bool,

    /// `b` lies entirely inside `a`
    pub b_in_a: bool,
}

impl Response {
    /// Creates a response from the contact found between `a` and `b`
    pub fn new(a: BodyHandle, b: BodyHandle, contact: Contact) -> Self {
        Self {
            a,
            b,
            overlap: contact.overlap,
            overlap_n: contact.overlap_n,
            overlap_v: contact.overlap_v,
            a_in_b: contact.a_in_b,
            b_in_a: contact.b_in_a,
        }
    }
}
