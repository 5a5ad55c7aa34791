mod body;
mod body_type;

pub use self::body::Body;
pub use self::body_type::BodyKind;

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling how a body takes part in collision passes
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct BodyFlags: u32 {
            /// Body never moves, is not refreshed by `update` and never initiates checks
            const STATIC = 0x01;

            /// Body reports overlaps but is never displaced by separation
            const TRIGGER = 0x02;

            /// Polygon contour is shifted so its centroid sits on the position
            const CENTERED = 0x04;
        }
    }
}

/// Options shared by every body factory
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyOptions {
    /// Initial rotation in radians
    pub angle: f32,

    pub is_static: bool,

    pub is_trigger: bool,

    /// Margin around the bounding box stored in the index; the system default when `None`
    pub padding: Option<f32>,

    /// Center polygonal contours on the position
    pub centered: bool,
}

impl BodyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn with_centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }
}
