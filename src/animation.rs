//! Periodic texture animations with scoped lifetimes.
//!
//! Animated screens (static flicker, cursor blink) register a step function
//! with the [`Animator`] and keep the returned [`AnimationHandle`]. The task
//! lives exactly as long as the handle: dropping it, or calling
//! [`AnimationHandle::cancel`], removes the task on the next
//! [`Animator::advance`]. The animator is advanced from the application's
//! update hook with the wall-clock time since the last frame, so the cadence
//! is independent of the frame rate.

use std::{cell::Cell, fmt::Debug, rc::Rc};

use instant::Duration;

/// Cancels its task when dropped.
#[must_use = "the animation stops as soon as its handle is dropped"]
#[derive(Debug)]
pub struct AnimationHandle {
    cancelled: Rc<Cell<bool>>,
    label: &'static str,
}

impl AnimationHandle {
    pub fn cancel(self) {
        drop(self);
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        if !self.cancelled.replace(true) {
            log::debug!("Animation '{}' cancelled", self.label);
        }
    }
}

struct Task {
    label: &'static str,
    interval: Duration,
    elapsed: Duration,
    cancelled: Rc<Cell<bool>>,
    step: Box<dyn FnMut()>,
}

/// Single-threaded scheduler for repeating animation steps.
#[derive(Default)]
pub struct Animator {
    tasks: Vec<Task>,
}

impl Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tasks.iter().map(|task| (task.label, task.interval)))
            .finish()
    }
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `step` every `interval` until the returned handle is dropped.
    pub fn every(
        &mut self,
        label: &'static str,
        interval: Duration,
        step: impl FnMut() + 'static,
    ) -> AnimationHandle {
        let cancelled = Rc::new(Cell::new(false));
        self.tasks.push(Task {
            label,
            interval: interval.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
            cancelled: cancelled.clone(),
            step: Box::new(step),
        });
        AnimationHandle { cancelled, label }
    }

    /// Advances every live task by `dt` and returns how many steps ran.
    ///
    /// A task runs at most once per call; whatever time is left over after a
    /// step is carried into the next call. Long stalls therefore do not cause
    /// a burst of redraws.
    pub fn advance(&mut self, dt: Duration) -> usize {
        self.tasks.retain(|task| !task.cancelled.get());
        let mut steps = 0;
        for task in self.tasks.iter_mut() {
            task.elapsed += dt;
            if task.elapsed >= task.interval {
                (task.step)();
                steps += 1;
                let remainder = task.elapsed.as_nanos() % task.interval.as_nanos();
                task.elapsed = Duration::from_nanos(remainder as u64);
            }
        }
        steps
    }

    /// Number of tasks whose handles are still alive.
    pub fn active(&self) -> usize {
        self.tasks.iter().filter(|task| !task.cancelled.get()).count()
    }
}
