//! Properties, the quick-check driver, and the shrink search.
//!
//! A property is a generator of [`TrialResult`]s: it wraps a value
//! generator and a predicate, catching predicate panics so that an
//! exception becomes a failing, non-truthy result rather than unwinding
//! through the driver. [`quick_check`] sequences trials over a cyclic size
//! sequence and, on the first failure, hands the failing rose tree to
//! [`shrink_search`].

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::data::{Seed, Size};
use crate::gen::Gen;
use crate::tree::Tree;

/// The bool-or-exception verdict of one predicate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
    /// The predicate panicked; the payload is rendered to a message.
    Exception(String),
}

impl Outcome {
    /// `true` only for [`Outcome::Pass`] — both `Fail` and `Exception`
    /// count as a counterexample for the driver and the shrink search.
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "pass"),
            Outcome::Fail => write!(f, "fail"),
            Outcome::Exception(message) => write!(f, "exception: {message}"),
        }
    }
}

/// One trial's verdict plus the generated inputs that produced it,
/// debug-rendered since `Property` is polymorphic over the generated type
/// but the driver and report need a single erased representation.
#[derive(Debug, Clone)]
pub struct TrialResult {
    pub outcome: Outcome,
    pub args: Vec<String>,
}

fn panic_payload_to_string(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "property panicked with a non-string payload".to_string()
    }
}

/// A property: a value generator paired with a predicate. [`Property`]
/// itself behaves as a generator of [`TrialResult`] once converted with
/// [`Property::to_gen`] — the generated rose tree's shrinks are exactly
/// the value generator's shrinks, each re-evaluated against the predicate.
pub struct Property<T> {
    gen: Gen<T>,
    predicate: Rc<dyn Fn(&T) -> bool>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Property {
            gen: self.gen.clone(),
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<T: fmt::Debug + 'static> Property<T> {
    /// Build a property from a generator and a boolean predicate. A
    /// predicate that panics is treated as [`Outcome::Exception`], not
    /// unwound.
    pub fn for_all<F>(gen: Gen<T>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        Property {
            gen,
            predicate: Rc::new(predicate),
        }
    }

    fn evaluate(predicate: &Rc<dyn Fn(&T) -> bool>, value: &T) -> Outcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| predicate(value)));
        match result {
            Ok(true) => Outcome::Pass,
            Ok(false) => Outcome::Fail,
            Err(payload) => Outcome::Exception(panic_payload_to_string(payload)),
        }
    }

    /// Convert to a generator of [`TrialResult`]: same shrink shape as
    /// the underlying value generator, every node re-evaluated against
    /// the predicate.
    pub fn to_gen(&self) -> Gen<TrialResult> {
        let predicate = Rc::clone(&self.predicate);
        self.gen.clone().map(move |value| {
            let outcome = Self::evaluate(&predicate, &value);
            TrialResult {
                outcome,
                args: vec![format!("{value:?}")],
            }
        })
    }
}

/// Sugar for [`Property::for_all`].
pub fn for_all<T, F>(gen: Gen<T>, predicate: F) -> Property<T>
where
    T: fmt::Debug + 'static,
    F: Fn(&T) -> bool + 'static,
{
    Property::for_all(gen, predicate)
}

/// A progress event surfaced to the driver's `reporter` callback. Neutral
/// by design: formatting the events into human-readable text is a
/// collaborator's job, not the core's.
#[derive(Debug, Clone)]
pub enum ReportEvent {
    Trial {
        property: Option<String>,
        so_far: usize,
        num_tests: usize,
    },
    Failure {
        property: Option<String>,
        result: String,
        trial_number: usize,
        failing_args: Vec<String>,
    },
}

/// Options for [`quick_check`].
#[derive(Clone)]
pub struct QuickCheckOpts {
    /// Explicit seed; `None` derives one from the wall clock and records
    /// it in the report either way.
    pub seed: Option<u64>,
    /// Upper bound on the size knob; trials cycle through `0..max_size`.
    pub max_size: usize,
    /// Name recorded on reporter events, purely cosmetic.
    pub property_name: Option<String>,
    pub reporter: Option<Rc<dyn Fn(&ReportEvent)>>,
}

impl Default for QuickCheckOpts {
    fn default() -> Self {
        QuickCheckOpts {
            seed: None,
            max_size: 200,
            property_name: None,
            reporter: None,
        }
    }
}

/// The outcome of a full `shrink_search` walk.
#[derive(Debug, Clone)]
pub struct ShrinkResult {
    pub total_nodes_visited: usize,
    pub depth: usize,
    pub result: Outcome,
    pub smallest: Vec<String>,
}

/// `quick_check`'s final report: success or a minimized counterexample.
#[derive(Debug, Clone)]
pub enum Report {
    Pass {
        num_tests: usize,
        seed: u64,
    },
    Fail {
        seed: u64,
        failing_size: usize,
        num_tests: usize,
        fail: Vec<String>,
        shrunk: ShrinkResult,
    },
}

impl Report {
    pub fn is_pass(&self) -> bool {
        matches!(self, Report::Pass { .. })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Pass { num_tests, seed } => {
                write!(f, "+++ OK, passed {num_tests} tests (seed {seed}).")
            }
            Report::Fail {
                seed,
                failing_size,
                num_tests,
                fail,
                shrunk,
            } => {
                writeln!(
                    f,
                    "*** Failed! Falsifiable (after {num_tests} tests and {} shrinks, seed {seed}, size {failing_size}):",
                    shrunk.total_nodes_visited
                )?;
                writeln!(f, "original: {fail:?}")?;
                write!(f, "shrunk ({}): {:?}", shrunk.result, shrunk.smallest)
            }
        }
    }
}

/// Run `num_tests` trials of `property`, reporting progress through
/// `opts.reporter` and shrinking on the first failure.
///
/// Per spec: the size sequence cycles `0..max_size`; each trial splits
/// the running seed into `(trial_seed, next_seed)` so every trial's
/// randomness is independent but the whole run is reproducible from
/// `opts.seed` alone.
pub fn quick_check<T>(num_tests: usize, property: &Property<T>, opts: QuickCheckOpts) -> Report
where
    T: fmt::Debug + 'static,
{
    let seed_value = opts.seed.unwrap_or_else(|| Seed::random().0);
    let mut running_seed = Seed::from_u64(seed_value);
    let max_size = opts.max_size.max(1);
    let gen = property.to_gen();

    for trial_number in 0..num_tests {
        let size = Size::new(trial_number % max_size);
        let (trial_seed, next_seed) = running_seed.split();
        running_seed = next_seed;

        let tree = gen.generate(size, trial_seed);

        if tree.value.outcome.is_pass() {
            if let Some(reporter) = &opts.reporter {
                reporter(&ReportEvent::Trial {
                    property: opts.property_name.clone(),
                    so_far: trial_number + 1,
                    num_tests,
                });
            }
            continue;
        }

        if let Some(reporter) = &opts.reporter {
            reporter(&ReportEvent::Failure {
                property: opts.property_name.clone(),
                result: tree.value.outcome.to_string(),
                trial_number,
                failing_args: tree.value.args.clone(),
            });
        }

        let fail = tree.value.args.clone();
        let shrunk = shrink_search(tree);
        return Report::Fail {
            seed: seed_value,
            failing_size: size.get(),
            num_tests: trial_number + 1,
            fail,
            shrunk,
        };
    }

    Report::Pass {
        num_tests,
        seed: seed_value,
    }
}

/// The shrink search from spec §4.14: a non-backtracking depth-first walk
/// that commits to the first deeper failure it finds at each level. This
/// is neither a global-minimum search nor a leftmost-leaf search — it is
/// the specific, reproducible traversal the driver's determinism contract
/// depends on, so it must not be "improved" into something more
/// exhaustive without breaking replay compatibility.
pub fn shrink_search(root: Tree<TrialResult>) -> ShrinkResult {
    let mut current_smallest = root.value.clone();
    let mut nodes: Vec<Tree<TrialResult>> = root.children().collect();
    let mut depth = 0usize;
    let mut visited = 0usize;

    loop {
        if nodes.is_empty() {
            break;
        }
        let head = nodes.remove(0);
        visited += 1;

        if head.value.outcome.is_pass() {
            // `nodes` already holds the tail; do not backtrack to head's
            // children, they were never failing.
            continue;
        }

        current_smallest = head.value.clone();
        let children: Vec<_> = head.children().collect();
        if !children.is_empty() {
            depth += 1;
            nodes = children;
        }
        // else: stay at this level, `nodes` already holds the tail.
    }

    ShrinkResult {
        total_nodes_visited: visited,
        depth,
        result: current_smallest.outcome,
        smallest: current_smallest.args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{bool as bool_gen, choose, int_range};
    use std::cell::RefCell;

    #[test]
    fn passing_property_reports_success() {
        let gen = choose(0, 100);
        let property = for_all(gen, |x: &i64| *x * *x >= 0);
        let report = quick_check(
            100,
            &property,
            QuickCheckOpts {
                seed: Some(42),
                max_size: 50,
                ..Default::default()
            },
        );
        match report {
            Report::Pass { num_tests, seed } => {
                assert_eq!(num_tests, 100);
                assert_eq!(seed, 42);
            }
            other => panic!("expected pass, got {other:?}"),
        }
    }

    #[test]
    fn integer_shrink_finds_the_boundary() {
        // forall x. x < 5 fails on x >= 5; the non-backtracking search
        // should land on the boundary value itself.
        let gen = int_range(0, 10000);
        let property = for_all(gen, |x: &i64| *x < 5);
        let report = quick_check(
            100,
            &property,
            QuickCheckOpts {
                seed: Some(1),
                ..Default::default()
            },
        );
        match report {
            Report::Fail { shrunk, .. } => {
                assert_eq!(shrunk.smallest, vec!["5".to_string()]);
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn vector_length_shrinks_to_minimal_failing_length() {
        let gen = crate::combinator::vector(choose(0, 1000));
        let property = for_all(gen, |v: &Vec<i64>| v.iter().sum::<i64>() < 100);
        let report = quick_check(
            100,
            &property,
            QuickCheckOpts {
                seed: Some(1),
                ..Default::default()
            },
        );
        match report {
            Report::Fail { shrunk, .. } => {
                // smallest.args[0] debug-renders a Vec<i64>; length-1 with
                // an element >= 100 is the minimal shape that still fails.
                assert_eq!(shrunk.smallest.len(), 1);
                let rendered = &shrunk.smallest[0];
                let inner = rendered
                    .strip_prefix('[')
                    .and_then(|s| s.strip_suffix(']'))
                    .unwrap_or_else(|| panic!("{rendered:?} is not a debug-rendered Vec"));
                let elements: Vec<i64> = if inner.is_empty() {
                    Vec::new()
                } else {
                    inner
                        .split(", ")
                        .map(|s| s.parse().unwrap_or_else(|e| panic!("{s:?} not an i64: {e}")))
                        .collect()
                };
                assert_eq!(elements.len(), 1, "expected a single-element vector, got {elements:?}");
                assert!(elements[0] >= 100, "element {} should be >= 100", elements[0]);
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn exception_in_predicate_triggers_shrink_not_unwind() {
        let gen = choose(0, 20);
        let property = for_all(gen, |x: &i64| {
            if *x > 3 {
                panic!("boom at {x}");
            }
            true
        });
        let report = quick_check(
            50,
            &property,
            QuickCheckOpts {
                seed: Some(7),
                ..Default::default()
            },
        );
        match report {
            Report::Fail { shrunk, .. } => {
                assert!(matches!(shrunk.result, Outcome::Exception(_)));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn replay_is_byte_identical() {
        let make_report = || {
            let gen = crate::combinator::vector(choose(-50, 50));
            let property = for_all(gen, |v: &Vec<i64>| v.iter().sum::<i64>() < 30);
            quick_check(
                200,
                &property,
                QuickCheckOpts {
                    seed: Some(12345),
                    max_size: 100,
                    ..Default::default()
                },
            )
        };
        let a = make_report();
        let b = make_report();
        match (a, b) {
            (Report::Fail { shrunk: sa, num_tests: na, .. }, Report::Fail { shrunk: sb, num_tests: nb, .. }) => {
                assert_eq!(na, nb);
                assert_eq!(sa.total_nodes_visited, sb.total_nodes_visited);
                assert_eq!(sa.depth, sb.depth);
                assert_eq!(sa.smallest, sb.smallest);
            }
            (a, b) => panic!("expected matching failures, got {a:?} and {b:?}"),
        }
    }

    #[test]
    fn reporter_receives_a_trial_event_per_pass() {
        let gen = bool_gen();
        let property = for_all(gen, |_: &bool| true);
        let count = Rc::new(RefCell::new(0usize));
        let count_clone = Rc::clone(&count);
        let opts = QuickCheckOpts {
            seed: Some(3),
            reporter: Some(Rc::new(move |event: &ReportEvent| {
                if let ReportEvent::Trial { .. } = event {
                    *count_clone.borrow_mut() += 1;
                }
            })),
            ..Default::default()
        };
        let report = quick_check(10, &property, opts);
        assert!(report.is_pass());
        assert_eq!(*count.borrow(), 10);
    }

    #[test]
    fn report_display_matches_snapshot_style() {
        let gen = choose(0, 5);
        let property = for_all(gen, |x: &i64| *x < 100);
        let report = quick_check(
            30,
            &property,
            QuickCheckOpts {
                seed: Some(99),
                ..Default::default()
            },
        );
        assert!(matches!(report, Report::Pass { .. }));
        let rendered = format!("{report}");
        archetype::snap("quick_check_pass_report", rendered);
    }
}
