pub mod black_scholes;
pub mod implied_vol;
