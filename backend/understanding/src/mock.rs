use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use scanflow_core::{Analysis, AnalysisError, DocumentAnalyzer, EncodedImage};

enum Outcome {
    Succeed(Analysis),
    Fail(String),
    Timeout,
}

/// A scripted analyzer that returns a canned outcome.
pub struct MockAnalyzer {
    outcome: Outcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockAnalyzer {
    pub fn succeeding(analysis: Analysis) -> Self {
        Self::with_outcome(Outcome::Succeed(analysis))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Fail(message.into()))
    }

    pub fn timing_out() -> Self {
        Self::with_outcome(Outcome::Timeout)
    }

    /// Sleep before answering, to hold an analysis in flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `analyze` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DocumentAnalyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(&self, _image: &EncodedImage) -> Result<Analysis, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Outcome::Succeed(analysis) => Ok(analysis.clone()),
            Outcome::Fail(message) => Err(AnalysisError::Transport(message.clone())),
            Outcome::Timeout => Err(AnalysisError::Timeout(self.delay.unwrap_or_default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanflow_core::Category;

    fn image() -> EncodedImage {
        EncodedImage::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap()
    }

    #[tokio::test]
    async fn returns_scripted_outcomes_and_counts_calls() {
        let analysis = Analysis {
            title: "Whiteboard notes".into(),
            category: Category::Whiteboard,
            extracted_text: "Q3 roadmap".into(),
            summary: "Planning session".into(),
            suggested_file_name: "q3_roadmap".into(),
        };
        let mock = MockAnalyzer::succeeding(analysis.clone());
        assert_eq!(mock.analyze(&image()).await.unwrap(), analysis);
        assert_eq!(mock.analyze(&image()).await.unwrap(), analysis);
        assert_eq!(mock.calls(), 2);

        let failing = MockAnalyzer::failing("connection reset");
        assert!(matches!(
            failing.analyze(&image()).await,
            Err(AnalysisError::Transport(m)) if m == "connection reset"
        ));

        let slow = MockAnalyzer::timing_out().with_delay(Duration::from_millis(5));
        assert!(matches!(slow.analyze(&image()).await, Err(AnalysisError::Timeout(_))));
    }
}
