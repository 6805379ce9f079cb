//! Scene playback
//!
//! Steps and fade timers are interleaved on one clock. In virtual mode the
//! clock jumps straight from deadline to deadline; in real-time mode the
//! player sleeps on the tokio timer until each deadline arrives.

use anyhow::Result;
use fader_animation::{Animator, FadeController, FadeOptions, FadeStart};
use fader_core::{Document, ElementStyle, Visibility};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::scene::{Scene, StepOp};

/// Playback settings
#[derive(Clone, Debug)]
pub struct PlayOptions {
    /// Seed for random drift
    pub seed: Option<u64>,
    /// Sleep between deadlines instead of jumping
    pub realtime: bool,
    /// Print every element after each deadline
    pub frames: bool,
    /// Stop once scene time passes this
    pub limit_ms: u64,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            seed: None,
            realtime: false,
            frames: false,
            limit_ms: 60_000,
        }
    }
}

/// What happened to one step
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub index: usize,
    pub op: StepOp,
    pub started_ms: u64,
    pub start: FadeStart,
    pub completed_ms: Option<u64>,
}

/// Result of playing a scene
#[derive(Debug)]
pub struct Report {
    pub steps: Vec<StepOutcome>,
    pub elapsed_ms: u64,
    /// Final style of every element, in scene order
    pub elements: Vec<(String, ElementStyle)>,
    /// Playback stopped at the limit with work still scheduled
    pub truncated: bool,
}

impl Report {
    /// Print a human-readable summary
    pub fn print(&self) {
        println!("scene finished after {}ms", self.elapsed_ms);
        if self.truncated {
            println!("(stopped at the time limit)");
        }
        for step in &self.steps {
            let completed = match step.completed_ms {
                Some(ms) => format!("completed at {ms}ms"),
                None => "never completed".to_string(),
            };
            let start = match &step.start {
                FadeStart::Running(_) => "running".to_string(),
                FadeStart::Settled => "settled".to_string(),
                FadeStart::Rejected(err) => format!("rejected ({err})"),
            };
            println!(
                "  step {} {:?} @ {}ms: {}, {}",
                step.index, step.op, step.started_ms, start, completed
            );
        }
        for (id, style) in &self.elements {
            println!("  {}", describe(id, style));
        }
    }
}

/// Play a scene to completion (or to the time limit)
pub async fn play(scene: &Scene, options: &PlayOptions) -> Result<Report> {
    let doc = scene.document();
    let mut animator = match options.seed {
        Some(seed) => Animator::with_seed(doc, seed),
        None => Animator::new(doc),
    };
    let mut fader = FadeController::new();

    let clock = Rc::new(Cell::new(0u64));
    let completions: Rc<RefCell<Vec<(usize, u64)>>> = Rc::new(RefCell::new(Vec::new()));
    let mut outcomes = Vec::with_capacity(scene.steps.len());

    let mut order: Vec<usize> = (0..scene.steps.len()).collect();
    order.sort_by_key(|&index| scene.steps[index].at_ms);
    let mut pending = order.into_iter().peekable();
    let mut truncated = false;

    loop {
        let next_step = pending.peek().map(|&index| scene.steps[index].at_ms);
        let Some(next) = next_step.into_iter().chain(animator.next_deadline()).min() else {
            break;
        };
        if next > options.limit_ms {
            tracing::warn!("stopping at the {}ms limit", options.limit_ms);
            truncated = true;
            break;
        }

        let now = animator.now_ms();
        if options.realtime && next > now {
            tokio::time::sleep(Duration::from_millis(next - now)).await;
        }

        clock.set(next);
        animator.advance_to(next);

        while let Some(index) = pending.next_if(|&index| scene.steps[index].at_ms <= next) {
            let step = &scene.steps[index];
            let fade_options = FadeOptions::from_value(&step.options);
            let callback = {
                let clock = clock.clone();
                let completions = completions.clone();
                move || completions.borrow_mut().push((index, clock.get()))
            };

            tracing::info!("step {} {:?} on '{}' at {}ms", index, step.op, step.target, next);
            let start = match step.op {
                StepOp::FadeOut => {
                    fader.fade_out(&mut animator, &step.target, callback, Some(&fade_options))
                }
                StepOp::FadeIn => {
                    fader.fade_in(&mut animator, &step.target, callback, Some(&fade_options))
                }
                StepOp::Replace => fader.fade_replace(
                    &mut animator,
                    &step.target,
                    step.in_target.as_deref().unwrap_or_default(),
                    callback,
                    Some(&fade_options),
                ),
            };

            outcomes.push(StepOutcome {
                index,
                op: step.op,
                started_ms: next,
                start,
                completed_ms: None,
            });
        }

        if options.frames {
            print_frame(next, animator.tree());
        }
    }

    for (index, at) in completions.borrow().iter() {
        if let Some(outcome) = outcomes.iter_mut().find(|o| o.index == *index) {
            outcome.completed_ms = Some(*at);
        }
    }

    let elements = animator
        .tree()
        .iter()
        .map(|(_, id, style)| (id.unwrap_or_default().to_string(), style.clone()))
        .collect();

    Ok(Report {
        steps: outcomes,
        elapsed_ms: animator.now_ms(),
        elements,
        truncated,
    })
}

fn print_frame(at_ms: u64, doc: &Document) {
    println!("[{at_ms:>6}ms]");
    for (_, id, style) in doc.iter() {
        println!("  {}", describe(id.unwrap_or_default(), style));
    }
}

fn describe(id: &str, style: &ElementStyle) -> String {
    let visibility = match style.visibility {
        Visibility::Visible => "visible",
        Visibility::Hidden => "hidden",
    };
    let scale = style
        .scale
        .map(|s| format!(" scale({s:.3})"))
        .unwrap_or_default();
    format!(
        "#{:<12} opacity {:>6.3} display {:<6} {:<7} left {:>5}px top {:>5}px{}",
        id, style.opacity, style.display, visibility, style.left, style.top, scale
    )
}
