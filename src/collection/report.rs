use std::fmt;
use std::sync::Arc;

/// One-way channel from a list screen to whoever displays its size.
///
/// The screen calls [`CountReporter::report`] after every fetch and every
/// successful delete; the receiving side never gets a handle back into the
/// screen's collection.
#[derive(Clone)]
pub struct CountReporter(Arc<dyn Fn(usize) + Send + Sync>);

impl CountReporter {
    pub fn new(sink: impl Fn(usize) + Send + Sync + 'static) -> Self {
        Self(Arc::new(sink))
    }

    pub fn report(&self, count: usize) {
        (self.0)(count)
    }
}

impl fmt::Debug for CountReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CountReporter")
    }
}
