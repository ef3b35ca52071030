//! Supershot - headless match runner
//!
//! Usage:
//!   cargo run -- scenarios                  # Run all scenario tests
//!   cargo run -- scenarios ability/ -v      # Run a category, details on failure
//!   cargo run -- trace tests/scenarios/match/regulation_lead_ends.toml
//!   cargo run -- trace <file.toml> --seed 7 # Coin toss decides the kickoff side

use bevy::prelude::*;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use supershot::testing::{
    RunOptions, SCENARIOS_DIR, TestResult, parse_test_file, run_scenario, run_test,
};

fn main() {
    let args: Vec<String> = env::args().collect();
    let code = match args.get(1).map(String::as_str) {
        Some("trace") => run_trace(&args[2..]),
        Some("scenarios") => run_scenarios(&args[2..]),
        None => run_scenarios(&[]),
        Some(other) => {
            eprintln!("Unknown command '{}'. Expected 'scenarios' or 'trace'.", other);
            2
        }
    };
    std::process::exit(code);
}

// =============================================================================
// SCENARIOS
// =============================================================================

fn run_scenarios(args: &[String]) -> i32 {
    let mut verbose = false;
    let mut filter: Option<String> = None;

    for arg in args {
        if arg == "--verbose" || arg == "-v" {
            verbose = true;
        } else if !arg.starts_with('-') {
            filter = Some(arg.clone());
        }
    }

    println!("Scenario Tests");
    println!("==============\n");

    let scenarios_path = Path::new(SCENARIOS_DIR);
    if !scenarios_path.exists() {
        println!("No scenarios directory found at {}", SCENARIOS_DIR);
        return 1;
    }

    let tests = discover_tests(scenarios_path, filter.as_deref());
    if tests.is_empty() {
        println!("No test files found.");
        if let Some(f) = filter {
            println!("Filter: {}", f);
        }
        return 1;
    }

    let mut passed = 0;
    let mut failed = 0;
    let mut errors = 0;

    for test_path in &tests {
        let rel_path = test_path.strip_prefix(scenarios_path).unwrap_or(test_path);
        let test_name = rel_path.with_extension("").to_string_lossy().to_string();

        let result = match parse_test_file(test_path) {
            Ok(def) => run_test(&def),
            Err(message) => TestResult::Error { message },
        };

        match &result {
            TestResult::Pass { .. } => passed += 1,
            TestResult::Fail { .. } => failed += 1,
            TestResult::Error { .. } => errors += 1,
        }
        print_result(&test_name, &result, verbose);
    }

    println!("\n==============");
    println!(
        "Results: {} passed, {} failed, {} errors",
        passed, failed, errors
    );

    if failed > 0 || errors > 0 { 1 } else { 0 }
}

fn discover_tests(base: &Path, filter: Option<&str>) -> Vec<PathBuf> {
    let mut tests = Vec::new();
    discover_tests_recursive(base, base, filter, &mut tests);
    tests.sort();
    tests
}

fn discover_tests_recursive(
    base: &Path,
    current: &Path,
    filter: Option<&str>,
    tests: &mut Vec<PathBuf>,
) {
    let Ok(entries) = fs::read_dir(current) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            discover_tests_recursive(base, &path, filter, tests);
        } else if path.extension().is_some_and(|e| e == "toml") {
            if let Some(f) = filter {
                let rel = path.strip_prefix(base).unwrap_or(&path).to_string_lossy();
                if !rel.contains(f) {
                    continue;
                }
            }
            tests.push(path);
        }
    }
}

fn print_result(name: &str, result: &TestResult, verbose: bool) {
    let dots = ".".repeat(40 - name.len().min(39));

    match result {
        TestResult::Pass { frames } => {
            println!("  {} {} PASS ({} frames)", name, dots, frames);
        }
        TestResult::Fail { error } => {
            println!("  {} {} FAIL", name, dots);
            if verbose {
                println!("    {}", error);
            } else {
                println!("    {}", error.message);
            }
        }
        TestResult::Error { message } => {
            println!("  {} {} ERROR", name, dots);
            println!("    {}", message);
        }
    }
}

// =============================================================================
// TRACE
// =============================================================================

/// Run one scenario with logging on and print its events as JSON lines
fn run_trace(args: &[String]) -> i32 {
    let mut path = None;
    let mut options = RunOptions {
        coin_toss_seed: None,
        logging: true,
    };

    let mut i = 0;
    while i < args.len() {
        if args[i] == "--seed" {
            let Some(seed) = args.get(i + 1).and_then(|v| v.parse().ok()) else {
                eprintln!("--seed expects an unsigned integer");
                return 2;
            };
            options.coin_toss_seed = Some(seed);
            i += 2;
        } else {
            path = Some(PathBuf::from(&args[i]));
            i += 1;
        }
    }

    let Some(path) = path else {
        eprintln!("Usage: supershot trace <scenario.toml> [--seed N]");
        return 2;
    };
    let def = match parse_test_file(&path) {
        Ok(def) => def,
        Err(message) => {
            eprintln!("{}", message);
            return 1;
        }
    };

    let (result, events) = run_scenario(&def, options);
    for captured in &events {
        match serde_json::to_string(&captured.event) {
            Ok(json) => println!("{:>6} {}", captured.frame, json),
            Err(e) => warn!("Unserializable event: {}", e),
        }
    }

    print_result(&def.name, &result, true);
    match result {
        TestResult::Pass { .. } => 0,
        _ => 1,
    }
}
