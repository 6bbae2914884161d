use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl StatusLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLevel::Success => "success",
            StatusLevel::Info => "info",
            StatusLevel::Warning => "warning",
            StatusLevel::Error => "error",
        }
    }
}

/// User-facing feedback shown next to the camera preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraStatus {
    pub message: &'static str,
    pub icon: &'static str,
    pub level: StatusLevel,
}

impl CameraStatus {
    pub const fn new(message: &'static str, icon: &'static str, level: StatusLevel) -> Self {
        Self {
            message,
            icon,
            level,
        }
    }

    /// Shown while the stream warms up, before the first detection tick.
    pub const fn initializing() -> Self {
        Self::new("Initializing camera...", "⏳", StatusLevel::Info)
    }

    /// Shown when the frame source refuses to start.
    pub const fn access_denied() -> Self {
        Self::new("Camera access denied", "⚠️", StatusLevel::Error)
    }
}

impl fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_icon() {
        assert_eq!(
            CameraStatus::initializing().to_string(),
            "⏳ Initializing camera..."
        );
    }

    #[test]
    fn test_access_denied_is_error() {
        assert_eq!(CameraStatus::access_denied().level, StatusLevel::Error);
        assert_eq!(StatusLevel::Error.as_str(), "error");
    }
}
