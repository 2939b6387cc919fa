use randlab_core::{EngineLimits, GenerationMethod};

pub struct GenerateCommandConfig<'a> {
    pub method: &'a str,
    pub params: &'a [String],
    pub max_iterations: usize,
    pub show: usize,
    pub json: bool,
    pub output_path: Option<&'a str>,
}

pub fn run(config: GenerateCommandConfig<'_>) {
    let params = super::parse_params(config.params);
    let method = GenerationMethod::from_parameters(config.method, &params)
        .unwrap_or_else(|e| super::fail(e));
    let limits = EngineLimits {
        max_iterations: config.max_iterations,
        ..EngineLimits::default()
    };
    let result = randlab_core::generate(&method, &limits).unwrap_or_else(|e| super::fail(e));

    if config.json {
        super::emit_json(&result, true, config.output_path);
        return;
    }

    let stats = &result.statistics;
    println!("🎲 {method}");
    match stats.period {
        Some(period) => println!(
            "   {} values, stopped by {} (period {period})",
            stats.count, stats.stopped_reason
        ),
        None => println!(
            "   {} values, stopped by {}",
            stats.count, stats.stopped_reason
        ),
    }
    println!(
        "   min {:.6}  max {:.6}  mean {:.6}",
        stats.min, stats.max, stats.mean
    );
    println!();

    let rows = super::rows_to_show(config.show, result.numbers.len());
    println!("  {:>7} {:>20} {:>12}", "n", "x_n", "r_n");
    println!("  {}", "-".repeat(41));
    for (i, (x, r)) in result.raw.iter().zip(&result.numbers).take(rows).enumerate() {
        println!("  {:>7} {:>20} {:>12.6}", i + 1, x, r);
    }
    if rows < result.numbers.len() {
        println!("  ... {} more (use --show 0 for all)", result.numbers.len() - rows);
    }

    if config.output_path.is_some() {
        super::emit_json(&result, false, config.output_path);
    }
}
