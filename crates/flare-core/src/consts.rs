/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Highest supported sensor bit depth (samples are stored as u16).
pub const MAX_BIT_DEPTH: u8 = 16;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f64 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f64 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f64 = 0.114;

// ---------------------------------------------------------------------------
// Evaluation defaults (typical 10-bit smartphone sensor)
// ---------------------------------------------------------------------------

/// Default sensor bit depth.
pub const DEFAULT_BIT_DEPTH: u8 = 10;

/// Default sensor black level in ADU.
pub const DEFAULT_OFFSET: u32 = 64;

/// Default minimum signal above the black level for a pixel to count as flare.
pub const DEFAULT_SIGNAL_THRESHOLD: u32 = 10;

/// Default upper bound (inclusive) of the flare region in ADU.
pub const DEFAULT_DIRECT_THRESHOLD: u32 = 400;

/// Default upper bound (inclusive) of the direct-light region in ADU.
pub const DEFAULT_LIGHT_THRESHOLD: u32 = 600;

/// Default pixel pitch in micrometers.
pub const DEFAULT_PIXEL_PITCH_UM: f64 = 2.4;

/// Default coverage penalty exponent for F_final.
pub const DEFAULT_BETA: f64 = 0.5;

// ---------------------------------------------------------------------------
// Quality grading
// ---------------------------------------------------------------------------

/// F_raw (ADU/um^2) at which the severity score saturates at 1.0.
pub const SEVERITY_SATURATION_F_RAW: f64 = 100.0;

/// Weight of the severity score in the quality index.
pub const SEVERITY_WEIGHT: f64 = 0.6;

/// Weight of the coverage score in the quality index.
pub const COVERAGE_WEIGHT: f64 = 0.4;

// ---------------------------------------------------------------------------
// Synthesis defaults
// ---------------------------------------------------------------------------

/// Default synthetic frame side length in pixels.
pub const DEFAULT_FRAME_SIZE: usize = 512;

/// Default noise standard deviation in ADU.
pub const DEFAULT_NOISE_SIGMA: f64 = 2.0;

/// Default light source core radius in pixels.
pub const DEFAULT_CORE_RADIUS: f64 = 3.0;

/// Halo characteristic length as a multiple of the core radius.
pub const DEFAULT_HALO_LENGTH_FACTOR: f64 = 3.0;

/// Halo cut-off distance as a multiple of the core radius.
pub const DEFAULT_HALO_EXTENT_FACTOR: f64 = 12.0;

/// Diffraction cross amplitude relative to the source intensity.
pub const DEFAULT_CROSS_GAIN: f64 = 0.25;

/// Diffraction cross decay length as a multiple of the core radius.
pub const DEFAULT_CROSS_LENGTH_FACTOR: f64 = 8.0;

/// Diffraction cross arm length as a multiple of the core radius.
pub const DEFAULT_CROSS_EXTENT_FACTOR: f64 = 24.0;

/// Intensity ratio between successive ghost reflections.
pub const DEFAULT_GHOST_ATTENUATION: f64 = 0.1;

/// Number of ghost reflections per ghosting light source.
pub const DEFAULT_GHOST_COUNT: usize = 1;

/// Per-channel radial scale step per unit of color temperature bias.
pub const DEFAULT_CHROMATIC_STEP: f64 = 0.15;

/// Lower bound for the blue channel radial scale under chromatic dispersion.
pub const MIN_CHROMATIC_SCALE: f64 = 0.1;

/// Randomly placed light sources keep this fraction of the frame side as margin.
pub const RANDOM_LIGHT_MARGIN_DIVISOR: usize = 8;

/// Hot pixels never overwrite samples above this fraction of the sensor range.
pub const HOT_PIXEL_PROTECT_FRACTION: f64 = 0.88;

/// Salt XORed into the caller seed to derive the noise random stream.
pub const NOISE_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Per-frame light displacement amplitude (pixels) for sequences with motion.
pub const SEQUENCE_MOTION_AMPLITUDE: f64 = 10.0;

/// Angular step (radians per frame) for sequences with motion.
pub const SEQUENCE_MOTION_STEP: f64 = 0.1;
