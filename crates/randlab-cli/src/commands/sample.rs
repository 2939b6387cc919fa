use randlab_core::{EngineLimits, RandomVariableRequest};

pub fn run(
    distribution: &str,
    count: i64,
    seed: Option<u64>,
    show: usize,
    json: bool,
    output_path: Option<&str>,
) {
    let request = RandomVariableRequest {
        count,
        distribution: distribution.to_string(),
        method: None,
        seed,
    };
    let result = request
        .run(&EngineLimits::default())
        .unwrap_or_else(|e| super::fail(e));

    if json {
        super::emit_json(&result, true, output_path);
        return;
    }

    let chart = &result.chart_data;
    let values = &result.generated_values;
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    println!(
        "🎯 {} on [{}, {}], M = {}",
        chart.function_name, chart.a, chart.b, chart.m
    );
    println!(
        "   {} accepted of {} trials (acceptance rate {:.4})",
        values.len(),
        result.r1.len(),
        result.acceptance_rate
    );
    println!("   sample mean {mean:.6}");
    println!();

    let rows = super::rows_to_show(show, values.len());
    for (i, x) in values.iter().take(rows).enumerate() {
        println!("  {:>6} {:>12.6}", i + 1, x);
    }
    if rows < values.len() {
        println!("  ... {} more (use --show 0 for all)", values.len() - rows);
    }

    if output_path.is_some() {
        super::emit_json(&result, false, output_path);
    }
}
