/// Events emitted while a batch of structures is being prepared.
#[derive(Debug, Clone)]
pub enum Progress {
    BatchStart { total: u64 },
    ItemFinished { index: usize, ok: bool },
    BatchFinish,
    /// A human-readable note about one item, such as why it was skipped.
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn silent_reporter_ignores_events() {
        ProgressReporter::new().report(Progress::BatchFinish);
    }

    #[test]
    fn callback_receives_every_event() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::ItemFinished { index, .. } = event {
                seen.lock().unwrap().push(index);
            }
        }));
        reporter.report(Progress::BatchStart { total: 2 });
        reporter.report(Progress::ItemFinished { index: 0, ok: true });
        reporter.report(Progress::ItemFinished { index: 1, ok: false });
        drop(reporter);
        assert_eq!(seen.into_inner().unwrap(), vec![0, 1]);
    }
}
