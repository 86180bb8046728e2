//! Skill Check entry point
//!
//! The browser build is driven from JavaScript through `SkillCheckWidget`.
//! Natively this runs a few rolled checks against the manual host with a bot
//! pressing the key, and logs the results.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use skill_check::platform::{ManualFrames, ManualKeys, press, pump};
    use skill_check::sim::{Indicator, RawKey, roll_check};
    use skill_check::{Difficulty, Settings};

    /// Simulated display refresh (ms per frame)
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Bot reaction offset from the arc midpoint (degrees), per round
    const BOT_AIM_ERROR: [f64; 3] = [0.0, 12.0, 40.0];

    pub fn run(seed: u64) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let results = Rc::new(RefCell::new(Vec::new()));

        let sink = results.clone();
        let mut indicator = Indicator::new(ManualFrames::new(), ManualKeys::new(), move |ok: bool| {
            sink.borrow_mut().push(ok)
        });

        let difficulties = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
        for (round, difficulty) in difficulties.into_iter().enumerate() {
            let settings = Settings {
                input_keys: vec!['w', 'a', 's', 'd'],
                ..Settings::from_preset(difficulty)
            };
            let (descriptor, config) = roll_check(&settings, &mut rng);
            let key = descriptor.key;
            let arc = config.target_arc();
            let aim = arc.start + arc.width / 2.0 + BOT_AIM_ERROR[round];

            log::info!(
                "Round {} ({}): press '{}' in [{:.0}, {:.0}]",
                round + 1,
                difficulty.as_str(),
                key,
                config.target_arc().start,
                config.target_arc().end()
            );
            indicator.activate(descriptor, config);

            let mut time = 0.0;
            while pump(&mut indicator, time) {
                if indicator.current_angle() >= aim {
                    let raw = RawKey::new(key.to_string(), format!("Key{}", key.to_ascii_uppercase()));
                    press(&mut indicator, &raw);
                }
                time += FRAME_MS;
            }
            log::info!("  {}", indicator.transform().to_svg());
        }

        for (round, ok) in results.borrow().iter().enumerate() {
            println!("Round {}: {}", round + 1, if *ok { "success" } else { "failure" });
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Skill Check (native) starting...");
    log::info!("Browser build exposes SkillCheckWidget - build with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is skill_check::platform::web::init, this is just to satisfy the compiler
}
