//! Formatter determinism (quickcheck)
//!
//! The command line is a pure function of (config, point, first-point flag):
//! formatting twice must give byte-identical output.

use bench_sweep::command::{child_args, format_invocation, progress_line};
use bench_sweep::config::{ExperimentConfig, Family};
use bench_sweep::sweep::ParameterPoint;
use quickcheck::quickcheck;

fn family(selector: u8) -> Family {
    Family::ALL[usize::from(selector) % Family::ALL.len()]
}

fn config(selector: u8, local_size: u32) -> ExperimentConfig {
    ExperimentConfig::builder(family(selector))
        .executable_path("bench")
        .output_path("out.dat")
        .local_size(u64::from(local_size))
        .build()
        .unwrap()
}

quickcheck! {
    fn prop_format_is_deterministic(selector: u8, local_size: u32, value: u32, ordinal: u16, first: bool) -> bool {
        let cfg = config(selector, local_size);
        let point = ParameterPoint::new(u64::from(ordinal), u64::from(value));
        let a = format_invocation(&cfg, point, first);
        let b = format_invocation(&cfg, point, first);
        a == b && a.to_string() == b.to_string()
    }

    fn prop_quiet_flag_always_first(selector: u8, value: u32) -> bool {
        let cfg = config(selector, 16);
        let args = child_args(&cfg, ParameterPoint::new(0, u64::from(value)));
        args[0].starts_with("-quiet")
    }

    fn prop_local_size_always_passed(selector: u8, local_size: u32, value: u32) -> bool {
        let cfg = config(selector, local_size);
        let point = ParameterPoint::new(0, u64::from(value));
        let lsz = format!("-lsz={local_size}");
        child_args(&cfg, point).contains(&lsz)
            && progress_line(&cfg, point).contains(&format!("lsz = {local_size}"))
    }
}

#[test]
fn test_rendered_line_ends_with_redirect_target() {
    let cfg = config(0, 256);
    let line = format_invocation(&cfg, ParameterPoint::new(3, 21), false).to_string();
    assert!(line.ends_with(">> out.dat"), "{line}");
}
