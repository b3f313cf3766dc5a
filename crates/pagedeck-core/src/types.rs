use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("failed to load document: {0}")]
    Load(String),
    #[error("failed to assemble document: {0}")]
    Assembly(String),
    #[error("{0}")]
    Validation(String),
    #[error("failed to render page: {0}")]
    Render(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("no pages to assemble")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, EditorError>;

/// Handle to a loaded source document. Assigned in upload order and
/// stable for the lifetime of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceIndex(pub usize);

/// Identity of one page entry. Monotonically increasing, never reused
/// within a session, so an entry keeps its id across reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u64);

/// Quarter-turn page rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// One more quarter turn clockwise, wrapping past 270 back to 0
    pub fn clockwise(self) -> Self {
        match self {
            Rotation::None => Rotation::Clockwise90,
            Rotation::Clockwise90 => Rotation::Clockwise180,
            Rotation::Clockwise180 => Rotation::Clockwise270,
            Rotation::Clockwise270 => Rotation::None,
        }
    }

    pub fn radians(self) -> f32 {
        (self.degrees() as f32).to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_quarter_turns_are_identity() {
        let mut rotation = Rotation::None;
        for _ in 0..4 {
            rotation = rotation.clockwise();
        }
        assert_eq!(rotation, Rotation::None);
    }

    #[test]
    fn degrees_follow_the_quarter_turn_steps() {
        assert_eq!(Rotation::None.degrees(), 0);
        assert_eq!(Rotation::None.clockwise().degrees(), 90);
        assert_eq!(Rotation::Clockwise270.degrees(), 270);
    }
}
