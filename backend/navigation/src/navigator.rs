use tracing::{debug, warn};
use uuid::Uuid;

use scanflow_core::{NavigationError, NavigationState, RecordIndex, View};

/// User-visible notice after a failed analysis.
pub const ANALYSIS_FAILED_NOTICE: &str =
    "AI analysis failed. Please try again or check your API key.";

/// Explicit navigation state machine.
///
/// Transitions:
///
/// ```text
/// dashboard --start_capture--> capturing
/// capturing --capture--------> dashboard (analysis in flight)
///           --analysis_succeeded(id)--> review(id)
///           --analysis_failed---------> dashboard + notice
/// capturing --cancel---------> dashboard
/// dashboard --open(id)-------> review(id)
/// review    --record_deleted(active)--> dashboard
/// any       --open_settings--> settings
/// settings  --close_settings-> dashboard
/// any       --home-----------> dashboard
/// ```
///
/// The active record is set only while in `review`, and `review` is only
/// entered for ids the supplied [`RecordIndex`] knows about. At most one
/// analysis may be in flight.
#[derive(Debug, Default)]
pub struct Navigator {
    view: View,
    active: Option<Uuid>,
    analyzing: bool,
    notice: Option<String>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn active(&self) -> Option<Uuid> {
        self.active
    }

    pub fn state(&self) -> NavigationState {
        NavigationState {
            view: self.view,
            active: self.active,
        }
    }

    /// Whether an analysis is in flight.
    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// Pending user-visible notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Take the pending notice so it is shown only once.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn start_capture(&mut self) -> Result<(), NavigationError> {
        if self.analyzing {
            return Err(NavigationError::AnalysisInFlight);
        }
        self.expect(View::Dashboard, "start capture")?;
        self.enter(View::Capturing, None);
        Ok(())
    }

    /// An image was captured; return to the dashboard while it is analyzed.
    pub fn capture(&mut self) -> Result<(), NavigationError> {
        self.expect(View::Capturing, "capture")?;
        if self.analyzing {
            return Err(NavigationError::AnalysisInFlight);
        }
        self.analyzing = true;
        self.notice = None;
        self.enter(View::Dashboard, None);
        Ok(())
    }

    /// Analysis produced record `id`; review it.
    pub fn analysis_succeeded(
        &mut self,
        id: Uuid,
        records: &dyn RecordIndex,
    ) -> Result<(), NavigationError> {
        if !self.analyzing {
            return Err(NavigationError::InvalidTransition {
                from: self.view,
                event: "complete analysis",
            });
        }
        self.analyzing = false;
        if !records.contains(&id) {
            return Err(NavigationError::UnknownRecord(id));
        }
        self.enter(View::Review, Some(id));
        Ok(())
    }

    /// Analysis failed; return to the dashboard with a notice.
    ///
    /// Only the length of `reason` is logged; the event log keeps the
    /// redacted text.
    pub fn analysis_failed(&mut self, reason: &str) {
        warn!(reason_len = reason.len(), view = ?self.view, "Analysis failed");
        self.analyzing = false;
        self.notice = Some(ANALYSIS_FAILED_NOTICE.to_string());
        self.enter(View::Dashboard, None);
    }

    pub fn cancel(&mut self) -> Result<(), NavigationError> {
        self.expect(View::Capturing, "cancel capture")?;
        self.enter(View::Dashboard, None);
        Ok(())
    }

    /// Open an existing record from the dashboard.
    pub fn open(&mut self, id: Uuid, records: &dyn RecordIndex) -> Result<(), NavigationError> {
        self.expect(View::Dashboard, "open a document")?;
        if !records.contains(&id) {
            return Err(NavigationError::UnknownRecord(id));
        }
        self.enter(View::Review, Some(id));
        Ok(())
    }

    /// A record was removed from the store. Returns true if it was the
    /// active one, in which case the navigator is back on the dashboard.
    pub fn record_deleted(&mut self, id: &Uuid) -> bool {
        if self.active != Some(*id) {
            return false;
        }
        self.enter(View::Dashboard, None);
        true
    }

    pub fn open_settings(&mut self) {
        self.enter(View::Settings, None);
    }

    pub fn close_settings(&mut self) -> Result<(), NavigationError> {
        self.expect(View::Settings, "close settings")?;
        self.enter(View::Dashboard, None);
        Ok(())
    }

    /// Go back to the dashboard from anywhere.
    pub fn home(&mut self) {
        self.enter(View::Dashboard, None);
    }

    fn expect(&self, view: View, event: &'static str) -> Result<(), NavigationError> {
        if self.view != view {
            return Err(NavigationError::InvalidTransition {
                from: self.view,
                event,
            });
        }
        Ok(())
    }

    fn enter(&mut self, view: View, active: Option<Uuid>) {
        debug!(from = %self.view, to = %view, "Navigation transition");
        self.view = view;
        self.active = active;
    }
}
