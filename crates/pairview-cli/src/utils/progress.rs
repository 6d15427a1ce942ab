use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use pairview::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

#[derive(Default)]
struct BarState {
    active_bar: Option<ProgressBar>,
    base_message: String,
}

/// Bridges the core's progress events onto indicatif bars.
#[derive(Clone)]
pub struct CliProgressHandler {
    mp: Arc<MultiProgress>,
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let mp = MultiProgress::new();
        mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
        Self {
            mp: Arc::new(mp),
            state: Arc::new(Mutex::new(BarState::default())),
        }
    }

    pub fn log(&self, msg: &str) {
        self.mp.println(msg).ok();
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let mp_clone = self.mp.clone();
        let state_clone = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state_clone.lock() else {
                warn!("Progress bar mutex was poisoned; cannot update UI.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    if let Some(bar) = state.active_bar.take() {
                        bar.finish_and_clear();
                    }

                    let pb = mp_clone.add(ProgressBar::new_spinner());
                    pb.enable_steady_tick(Duration::from_millis(80));
                    pb.set_style(Self::spinner_style());
                    pb.set_message(name.to_string());

                    state.active_bar = Some(pb);
                    state.base_message = name.to_string();
                }
                Progress::PhaseFinish => {
                    if let Some(bar) = state.active_bar.take() {
                        bar.finish_and_clear();
                    }
                    state.base_message.clear();
                }
                Progress::TaskStart { total_steps } => {
                    if let Some(bar) = state.active_bar.as_ref() {
                        bar.set_style(Self::bar_style());
                        bar.set_length(total_steps);
                        bar.set_position(0);
                        bar.disable_steady_tick();
                    }
                }
                Progress::TaskIncrement => {
                    if let Some(bar) = state.active_bar.as_ref() {
                        bar.inc(1);
                    }
                }
                Progress::TaskFinish => {
                    if let Some(bar) = state.active_bar.as_ref() {
                        bar.finish();
                        bar.set_style(Self::spinner_style());
                        bar.set_message(state.base_message.clone());
                        bar.enable_steady_tick(Duration::from_millis(80));
                    }
                }
                Progress::Message(msg) => {
                    mp_clone.println(format!("  {}", msg)).ok();
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<30} [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("Invalid template")
            .progress_chars("━╸ ")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_active_bar(handler: &CliProgressHandler) -> Option<ProgressBar> {
        handler.state.lock().unwrap().active_bar.clone()
    }

    #[test]
    fn new_handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        let state = handler.state.lock().unwrap();
        assert!(state.active_bar.is_none());
        assert!(state.base_message.is_empty());
    }

    #[test]
    fn phase_start_creates_a_new_spinner_and_sets_base_message() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Test Phase" });

        let bar = get_active_bar(&handler).expect("Bar should be active");
        assert_eq!(bar.message(), "Test Phase");
        assert!(!bar.is_finished());
    }

    #[test]
    fn task_start_transforms_spinner_into_progress_bar() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();
        callback(Progress::PhaseStart { name: "Processing" });

        callback(Progress::TaskStart { total_steps: 100 });

        let bar = get_active_bar(&handler).expect("Bar should still be active");
        assert_eq!(bar.length(), Some(100));
        assert_eq!(bar.position(), 0);
    }

    #[test]
    fn phase_finish_clears_the_bar() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();
        callback(Progress::PhaseStart { name: "Finalizing" });
        callback(Progress::PhaseFinish);
        assert!(get_active_bar(&handler).is_none());
    }
}
