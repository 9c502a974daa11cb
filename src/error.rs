use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParfindError {
    // Config
    #[error("invalid thread count {threads} for {len} elements")]
    InvalidThreadCount { threads: usize, len: usize },

    // Runtime
    #[error("failed to spawn worker thread {worker}")]
    ThreadSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },
}

impl ParfindError {
    /// Whether the search was rejected before any thread was created.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidThreadCount { .. })
    }

    /// Whether the search failed because the OS refused a resource.
    ///
    /// Any workers that did start were released and joined before this
    /// error was returned.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::ThreadSpawn { .. })
    }
}
