// demos/demo.rs
use mc_greeks::analytics::{black_scholes, implied_vol};
use mc_greeks::instruments::{EuropeanOption, OptionKind};
use mc_greeks::math_utils::Timer;
use mc_greeks::mc::{price_gbm, price_heston, FiniteDifferenceGreeks, GreekSet, SimulationConfig};
use mc_greeks::models::{GbmParams, HestonParams};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Running mc-greeks Monte Carlo Demo\n");

    let paths = 1_000_000;
    let s0 = 100.0;
    let k = 100.0;
    let r = 0.05;
    let sigma = 0.2;
    let t = 1.0;

    let market = GbmParams::new(s0, r, sigma);
    let call = EuropeanOption::call(k, t);
    let config = SimulationConfig::new(paths).with_seed(42);

    // --- European Call Pricing ---
    println!("--- European Call Pricing (GBM, {} workers) ---", config.num_workers);

    let mut timer = Timer::new();
    timer.start();
    let estimate = price_gbm(&call, &market, &config);
    let price_time = timer.elapsed_ms();
    let analytic_price = black_scholes::call_price(s0, k, r, sigma, t);
    let abs_error = (estimate.price - analytic_price).abs();

    println!("MC Price: {:.6} ± {:.6} ({:.1} ms)", estimate.price, estimate.std_error, price_time);
    println!("Analytic Price: {:.6}", analytic_price);
    println!("Absolute Error: {:.6} ({:.2} std errors)", abs_error, abs_error / estimate.std_error);
    println!("Throughput: {:.0} paths/sec\n", estimate.paths as f64 / (price_time / 1000.0));

    // --- Antithetic vs Plain ---
    println!("--- Antithetic Variates ---");
    let plain = price_gbm(&call, &market, &config.clone().with_antithetic(false));
    println!("Plain:      {:.6} ± {:.6}", plain.price, plain.std_error);
    println!("Antithetic: {:.6} ± {:.6}\n", estimate.price, estimate.std_error);

    // --- Finite-Difference Greeks ---
    println!("--- Finite-Difference Greeks (common random numbers) ---");
    let fd = FiniteDifferenceGreeks::from_config(config.clone());

    timer.start();
    let greeks = fd.compute(&call, &market, GreekSet::all());
    let greeks_time = timer.elapsed_ms();

    let rows = [
        ("Delta", greeks.delta, black_scholes::call_delta(s0, k, r, sigma, t)),
        ("Gamma", greeks.gamma, black_scholes::gamma(s0, k, r, sigma, t)),
        ("Vega", greeks.vega, black_scholes::vega(s0, k, r, sigma, t)),
        ("Rho", greeks.rho, black_scholes::call_rho(s0, k, r, sigma, t)),
    ];
    for (name, mc, analytic) in rows {
        if let Some(mc) = mc {
            println!(
                "{:<6} MC: {:>10.6}  Analytic: {:>10.6}  Rel Error: {:.3}%",
                name,
                mc,
                analytic,
                100.0 * (mc - analytic).abs() / analytic.abs()
            );
        }
    }
    println!("({:.1} ms for all four)\n", greeks_time);

    // --- Heston ---
    println!("--- Heston Call (full truncation Euler) ---");
    let heston = HestonParams {
        spot: s0,
        rate: r,
        v0: 0.04,
        kappa: 2.0,
        theta: 0.04,
        xi: 0.3,
        rho: -0.7,
    };
    let heston_config = SimulationConfig::new(200_000).with_steps(252).with_seed(42);

    timer.start();
    let heston_price = price_heston(&call, &heston, &heston_config);
    let heston_time = timer.elapsed_ms();
    println!("Feller condition satisfied: {}", heston.feller_satisfied());
    println!("MC Price: {:.6} ({:.1} ms)", heston_price, heston_time);

    match implied_vol::implied_volatility(heston_price, OptionKind::Call, s0, k, r, t) {
        Ok(iv) => println!("Black-Scholes implied volatility: {:.4}\n", iv),
        Err(e) => eprintln!("Implied volatility failed: {}\n", e),
    }

    // --- Put-Call Parity Check ---
    println!("--- Put-Call Parity ---");
    let put = EuropeanOption::put(k, t);
    let put_estimate = price_gbm(&put, &market, &config);
    let parity_gap = estimate.price - put_estimate.price - (s0 - k * (-r * t).exp());
    println!("C - P - (S - K e^(-rT)) = {:.6}", parity_gap);
}
