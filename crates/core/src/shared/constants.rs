/// Pre-trained frontal face cascade shipped next to the executable.
pub const CASCADE_FILE_NAME: &str = "haarcascade_frontalface_default.xml";

/// Application directory name under the platform config/data directories.
pub const APP_DIR_NAME: &str = "FaceWatch";

pub const DEFAULT_WINDOW_TITLE: &str = "Video Frame";

pub const DEFAULT_QUIT_KEY: char = 'q';

/// Key wait per iteration; doubles as loop pacing.
pub const DEFAULT_KEY_WAIT_MS: u64 = 1;

/// Working frame is half the captured size in each direction.
pub const DEFAULT_WORKING_SCALE: f64 = 0.5;

pub const DEFAULT_SCALE_FACTOR: f64 = 1.2;
pub const DEFAULT_MIN_NEIGHBORS: u32 = 5;
pub const DEFAULT_MIN_SIZE: (u32, u32) = (30, 30);
pub const DEFAULT_LINE_THICKNESS: u32 = 2;

/// Skin-tone HSV bounds (8-bit hue convention).
pub const SKIN_HSV_LOWER: [u8; 3] = [0, 58, 30];
pub const SKIN_HSV_UPPER: [u8; 3] = [33, 255, 255];

/// Log progress every this many frames.
pub const PROGRESS_THROTTLE_FRAMES: usize = 100;
