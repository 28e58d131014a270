#![cfg(feature = "trace")]

//! Step-by-step trace output.
//!
//! Two runs with the same configuration must produce identical traces, and
//! the tagged lines must agree with the run's counters.

use std::sync::Arc;

use mcs::{Mcs, McsOptions, McsResult, TraceWriter};

fn shifted_quadratic(x: &[f64]) -> f64 {
    (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2)
}

fn traced_run(options: McsOptions) -> (McsResult, Arc<TraceWriter>) {
    let tracer = Arc::new(TraceWriter::new());
    let mut mcs = Mcs::new(shifted_quadratic, &vec![(-5.0, 5.0), (-5.0, 5.0)], options)
        .unwrap()
        .with_tracer(Arc::clone(&tracer));
    let result = mcs.minimize().unwrap();
    (result, tracer)
}

fn options() -> McsOptions {
    McsOptions {
        max_levels: Some(8),
        max_feval: 400,
        ..Default::default()
    }
}

#[test]
fn test_trace_is_reproducible() {
    let (_, a) = traced_run(options());
    let (_, b) = traced_run(options());
    let (la, lb) = (a.get_lines(), b.get_lines());
    assert!(!la.is_empty());
    assert_eq!(la.len(), lb.len());
    for (i, (x, y)) in la.iter().zip(&lb).enumerate() {
        assert_eq!(x, y, "trace line {} differs", i);
    }
}

#[test]
fn test_trace_tags_match_counters() {
    let (result, tw) = traced_run(options());
    let lines = tw.get_lines();
    assert!(lines[0].starts_with("TRACE INIT nfev=5 "));
    assert!(lines[0].contains("nboxes=9"));
    assert_eq!(tw.lines_tagged("INIT").len(), 1);
    assert_eq!(tw.lines_tagged("SWEEP").len(), result.nsweep);
    assert_eq!(tw.lines_tagged("LOCAL").len(), result.nlocal);
    assert!(tw.lines_tagged("SELECT").len() >= tw.lines_tagged("SPLIT").len());
    assert!(tw.lines_tagged("SPLIT").iter().any(|l| l.contains("kind=gain")));
}

#[test]
fn test_trace_without_local_search() {
    let (result, tw) = traced_run(McsOptions {
        local_search_steps: 0,
        ..options()
    });
    assert_eq!(result.nlocal, 0);
    assert!(tw.lines_tagged("BASKET").is_empty());
    assert!(tw.lines_tagged("LOCAL").is_empty());
}
