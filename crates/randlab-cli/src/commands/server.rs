use randlab_core::EngineLimits;
use randlab_server::ServerConfig;

pub fn run(host: &str, port: u16, max_iterations: usize, max_variates: usize) {
    let config = ServerConfig {
        host: host.to_string(),
        port,
        limits: EngineLimits {
            max_iterations,
            max_variates,
            ..EngineLimits::default()
        },
    };

    let base = format!("http://{}", config.addr());

    println!("🔬 randlab server v{}", randlab_core::VERSION);
    println!("   {base}");
    println!();
    println!("   Endpoints:");
    println!("     GET  /                  API index (try: curl {base})");
    println!("     POST /generate          Generate a sequence until it repeats");
    println!("     POST /validate          Check a method's period theorem");
    println!("     POST /statistical-test  Chi-square or Kolmogorov-Smirnov test");
    println!("     POST /random-variables  Acceptance-rejection sampling");
    println!("     GET  /health            Health check");
    println!();
    println!("   Limits:");
    println!("     max_iterations={max_iterations}  max_variates={max_variates}");
    println!();
    println!("   Example:");
    println!(
        "     curl -X POST {base}/generate -H 'content-type: application/json' \\\n       \
         -d '{{\"method\":\"mixed_congruential\",\"parameters\":{{\"x0\":7,\"a\":5,\"b\":3,\"m\":16}}}}'"
    );
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start the async runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(randlab_server::run_server(config)) {
        eprintln!("Server error on {base}: {e}");
        std::process::exit(1);
    }
}
