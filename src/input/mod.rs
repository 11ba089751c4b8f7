mod collector;
mod guard;

pub use collector::{
    collect_paths, detect_mime, expand_paths, is_supported_image, load_file, resolve_sources,
    DroppedInput, InputCollector, InputSource, IMAGE_EXTENSIONS,
};
pub use guard::ActivationGuard;
