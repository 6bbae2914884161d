use std::fs;
use std::path::{Path, PathBuf};

use crate::camera::domain::frame_source::{
    FramePoll, FrameSource, FrameSourceError, SourceError,
};
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

/// Plays a list of image files back as camera frames.
///
/// Each poll decodes the next file into an RGBA frame. Frame indices keep
/// counting across loops; `index % paths().len()` is the file position.
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    looping: bool,
    started: bool,
    next_index: usize,
}

impl ImageSequenceSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            looping: false,
            started: false,
            next_index: 0,
        }
    }

    /// All images directly inside `dir`, sorted by file name.
    pub fn from_dir(dir: &Path) -> Result<Self, FrameSourceError> {
        let entries = fs::read_dir(dir).map_err(|source| FrameSourceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| FrameSourceError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();
            if path.is_file() && is_image(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(Self::new(paths))
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn decode(&self, path: &Path, index: usize) -> Result<Frame, FrameSourceError> {
        let image = image::open(path).map_err(|source| FrameSourceError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Frame::try_new(rgba.into_raw(), width, height, 4, index)?)
    }
}

impl FrameSource for ImageSequenceSource {
    fn start(&mut self) -> Result<(), SourceError> {
        if self.paths.is_empty() {
            return Err(FrameSourceError::Empty.into());
        }
        self.started = true;
        self.next_index = 0;
        Ok(())
    }

    fn poll(&mut self) -> Result<FramePoll, SourceError> {
        if !self.started {
            return Err(FrameSourceError::NotStarted.into());
        }
        if !self.looping && self.next_index >= self.paths.len() {
            return Ok(FramePoll::Ended);
        }

        let index = self.next_index;
        self.next_index += 1;
        let path = self.paths[index % self.paths.len()].clone();
        Ok(FramePoll::Ready(self.decode(&path, index)?))
    }

    fn stop(&mut self) {
        self.started = false;
    }
}

/// Whether `path` has one of the supported image extensions.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_image(dir: &Path, name: &str, rgb: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        let mut img = image::RgbImage::new(8, 6);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb(rgb);
        }
        img.save(&path).unwrap();
        path
    }

    fn expect_frame(poll: FramePoll) -> Frame {
        match poll {
            FramePoll::Ready(frame) => frame,
            other => panic!("expected a frame, got {other:?}"),
        }
    }

    #[test]
    fn test_start_empty_errors() {
        let mut source = ImageSequenceSource::new(Vec::new());
        assert!(source.start().is_err());
    }

    #[test]
    fn test_poll_before_start_errors() {
        let mut source = ImageSequenceSource::new(vec![PathBuf::from("a.png")]);
        assert!(source.poll().is_err());
    }

    #[test]
    fn test_yields_rgba_frames_in_order_then_ends() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_test_image(dir.path(), "a.png", [50, 100, 200]);
        let b = write_test_image(dir.path(), "b.png", [10, 20, 30]);
        let mut source = ImageSequenceSource::new(vec![a, b]);
        source.start().unwrap();

        let first = expect_frame(source.poll().unwrap());
        assert_eq!(first.index(), 0);
        assert_eq!(first.channels(), 4);
        assert_eq!((first.width(), first.height()), (8, 6));
        assert_eq!(&first.data()[..4], &[50, 100, 200, 255]);

        let second = expect_frame(source.poll().unwrap());
        assert_eq!(second.index(), 1);
        assert_eq!(second.data()[0], 10);

        assert!(matches!(source.poll().unwrap(), FramePoll::Ended));
    }

    #[test]
    fn test_looping_wraps_and_keeps_counting() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_test_image(dir.path(), "a.png", [1, 2, 3]);
        let mut source = ImageSequenceSource::new(vec![a]).looping(true);
        source.start().unwrap();

        expect_frame(source.poll().unwrap());
        let again = expect_frame(source.poll().unwrap());
        assert_eq!(again.index(), 1);
        assert_eq!(again.data()[0], 1);
    }

    #[test]
    fn test_restart_plays_from_first_image() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_test_image(dir.path(), "a.png", [40, 0, 0]);
        let b = write_test_image(dir.path(), "b.png", [80, 0, 0]);
        let mut source = ImageSequenceSource::new(vec![a, b]);

        source.start().unwrap();
        expect_frame(source.poll().unwrap());
        source.stop();
        source.start().unwrap();

        let first = expect_frame(source.poll().unwrap());
        assert_eq!(first.index(), 0);
        assert_eq!(first.data()[0], 40);
    }

    #[test]
    fn test_undecodable_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"not an image").unwrap();
        let mut source = ImageSequenceSource::new(vec![path]);
        source.start().unwrap();
        assert!(source.poll().is_err());
    }

    #[test]
    fn test_from_dir_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write_test_image(dir.path(), "b.png", [0, 0, 0]);
        fs::write(dir.path().join("a.PNG"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

        let source = ImageSequenceSource::from_dir(dir.path()).unwrap();
        let names: Vec<_> = source
            .paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.png"]);
    }

    #[test]
    fn test_from_missing_dir_errors() {
        let result = ImageSequenceSource::from_dir(Path::new("/nonexistent/frames"));
        assert!(matches!(result, Err(FrameSourceError::Io { .. })));
    }

    #[test]
    fn test_is_image_case_insensitive() {
        assert!(is_image(Path::new("face.JPG")));
        assert!(is_image(Path::new("face.webp")));
        assert!(!is_image(Path::new("face.mp4")));
        assert!(!is_image(Path::new("face")));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut source = ImageSequenceSource::new(vec![PathBuf::from("a.png")]);
        source.start().unwrap();
        source.stop();
        source.stop();
        assert!(source.poll().is_err());
    }
}
