use std::fmt;

/// Why [`Engine::init`](super::Engine::init) refused to bring the engine up.
///
/// Every variant leaves the engine fully uninitialized; the caller may fix the
/// cause and call `init` again.
#[derive(Debug)]
pub enum InitError {
    /// This engine, or another one in the process, is already running.
    AlreadyInitialized,
    InvalidConfig(String),
    WindowCreate(anyhow::Error),
    WindowInit(anyhow::Error),
    Transcoder(anyhow::Error),
    Renderer(anyhow::Error),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::AlreadyInitialized => write!(f, "engine is already initialized"),
            InitError::InvalidConfig(msg) => write!(f, "invalid engine config: {msg}"),
            InitError::WindowCreate(e) => write!(f, "window creation failed: {e:#}"),
            InitError::WindowInit(e) => write!(f, "window initialization failed: {e:#}"),
            InitError::Transcoder(e) => write!(f, "transcoder warm-up failed: {e:#}"),
            InitError::Renderer(e) => write!(f, "renderer initialization failed: {e:#}"),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::WindowCreate(e)
            | InitError::WindowInit(e)
            | InitError::Transcoder(e)
            | InitError::Renderer(e) => Some(e.as_ref()),
            InitError::AlreadyInitialized | InitError::InvalidConfig(_) => None,
        }
    }
}
