//! Plinko Dial entry point
//!
//! The browser build is driven through `platform::web`. Natively this runs a
//! headless board: `plinko-dial [DIGITS] [SEED]` drops each digit in turn and
//! prints the resulting number.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use plinko_dial::consts::SIM_DT;
    use plinko_dial::sim::{BoardEvent, SimState, tick};

    /// Ten simulated seconds per ball before giving up on it
    const MAX_TICKS_PER_DROP: u32 = 1200;

    env_logger::init();
    log::info!("Plinko Dial (native) starting...");

    let mut args = std::env::args().skip(1);
    let digits = args.next().unwrap_or_else(|| "5551234567".to_string());
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    let mut state = SimState::new(seed);
    log::info!("Board initialized with seed: {}", seed);

    for c in digits.chars() {
        if let Err(err) = state.drop_digit(&c.to_string()) {
            eprintln!("Skipping {c:?}: {err}");
            continue;
        }

        for _ in 0..MAX_TICKS_PER_DROP {
            if state.falling_count() == 0 {
                break;
            }
            for event in tick(&mut state, SIM_DT) {
                match event {
                    BoardEvent::BinFilled { bin, digit, .. } => {
                        println!("{digit} -> bin {bin}   {}", state.slots);
                    }
                    BoardEvent::BallLost { digit, .. } => {
                        println!("{digit} -> lost");
                    }
                }
            }
        }
        if state.falling_count() > 0 {
            log::warn!("Ball still bouncing after {MAX_TICKS_PER_DROP} ticks");
        }
    }

    println!("Your entered number is: {}", state.enter());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
