use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use crate::io::open_trace;
use crate::simulator::{SimulationResult, Simulator};
use crate::trace::parse_trace;
use crate::util::{get_fixtures, FIXTURES_PATH};

#[test]
fn run_all_fixtures() -> Result<(), Box<dyn Error>> {
    let fixtures = get_fixtures(FIXTURES_PATH)?;
    assert!(!fixtures.is_empty(), "no fixtures found in {FIXTURES_PATH}");
    for fixture in fixtures {
        println!("Running test for {}", fixture.name);
        // Read expected output
        let expected_output_file = File::open(&fixture.expected)?;
        let expected_output: SimulationResult = serde_json::from_reader(BufReader::new(expected_output_file))?;
        // Simulate!
        let trace = parse_trace(open_trace(&fixture.trace)?)?;
        let mut simulator = Simulator::new(&trace.config)?;
        simulator.simulate(&trace.references);
        let result = simulator.finish();
        assert_eq!(result, expected_output, "fixture {}", fixture.name);
        let time = simulator.get_execution_time();
        println!("Success for {}, time: {}", fixture.name, time.as_nanos() as f64 / 1e9);
    }
    Ok(())
}

#[test]
fn finishing_twice_gives_the_same_result() -> Result<(), Box<dyn Error>> {
    let fixture = get_fixtures(FIXTURES_PATH)?
        .into_iter()
        .find(|f| f.name == "unified_wb_wa")
        .ok_or("missing unified_wb_wa fixture")?;
    let trace = parse_trace(open_trace(&fixture.trace)?)?;
    let mut simulator = Simulator::new(&trace.config)?;
    simulator.simulate(&trace.references);
    let first = simulator.finish();
    let second = simulator.finish();
    assert_eq!(first, second);
    assert_eq!(first.data.copies_back, 3);
    Ok(())
}

#[test]
fn mapped_trace_reads_like_the_file() -> Result<(), Box<dyn Error>> {
    let fixture = get_fixtures(FIXTURES_PATH)?
        .into_iter()
        .next()
        .ok_or("no fixtures")?;
    let mapped: Vec<String> = open_trace(&fixture.trace)?.lines().collect::<Result<_, _>>()?;
    let buffered: Vec<String> = BufReader::new(File::open(&fixture.trace)?).lines().collect::<Result<_, _>>()?;
    assert_eq!(mapped, buffered);
    let error = open_trace(format!("{FIXTURES_PATH}/missing.trace")).err().ok_or("opened a missing trace")?;
    assert!(error.starts_with("Couldn't open the trace file"), "{error}");
    Ok(())
}
