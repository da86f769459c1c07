//! Write a synthetic experiment directory in the instrument export layout.
//!
//! Usage: `generate_sample [OUTPUT_DIR]` (default `sample_experiment`).

use std::fmt::Write as _;
use std::path::PathBuf;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const PAR_STEPS: [f64; 9] = [0.0, 11.0, 27.0, 58.0, 100.0, 179.0, 293.0, 470.0, 701.0];
const STEP_SECONDS: f64 = 30.0;

/// One light curve as export text. `quenching` scales how fast Fm' drops.
fn light_curve(labels: &str, fm: f64, fo: f64, quenching: f64, rng: &mut SimpleRng) -> String {
    let mut out = String::new();
    writeln!(out, "{labels}").unwrap();
    writeln!(
        out,
        "t;ML;Temp.;PAR;F;Fo';Fm';~Fo';Y(II);Y(NPQ);Y(NO);NPQ;qN;qP;qL;ETR;"
    )
    .unwrap();
    writeln!(out, "Device;PAM-2500;;;;;;;;;;;;;;;").unwrap();
    writeln!(out, "Date;2023-03-14;;;;;;;;;;;;;;;").unwrap();
    writeln!(out, "Mode;Light Curve;;;;;;;;;;;;;;;").unwrap();
    writeln!(out, "Unit;s;;C;umol/m2/s;mV;mV;mV;mV;;;;;;;;").unwrap();

    for (step, &par) in PAR_STEPS.iter().enumerate() {
        let t = step as f64 * STEP_SECONDS;
        let npq = quenching * par / (par + 150.0);
        let fm_prime = fm / (1.0 + npq) + rng.gauss(0.0, 2.0);
        let fo_prime = fo / (1.0 + 0.3 * npq) + rng.gauss(0.0, 1.0);
        let closed = par / (par + 250.0);
        let f = fo_prime + (fm_prime - fo_prime) * closed;
        let y2 = (fm_prime - f) / fm_prime;
        let ynpq = f / fm_prime - f / fm;
        let yno = f / fm;
        let qn = 1.0 - (fm_prime - fo_prime) / (fm - fo);
        let qp = (fm_prime - f) / (fm_prime - fo_prime);
        let ql = qp * fo_prime / f;
        let etr = y2 * par * 0.84 * 0.5;
        // The instrument only reports Fo' on some steps.
        let measured_fo = if step % 3 == 0 {
            format!("{fo_prime:.1}")
        } else {
            String::new()
        };
        let temp = 20.0 + rng.gauss(0.0, 0.1);
        writeln!(
            out,
            "{t:.0};on;{temp:.1};{par:.0};{f:.1};{measured_fo};{fm_prime:.1};{fo_prime:.1};{y2:.3};{ynpq:.3};{yno:.3};{npq:.3};{qn:.3};{qp:.3};{ql:.3};{etr:.1};"
        )
        .unwrap();
    }
    writeln!(out, "End;{};;;;;;;;;;;;;;;", PAR_STEPS.len()).unwrap();
    out
}

fn main() {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_experiment"));
    std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");

    let mut rng = SimpleRng::new(42);
    let samples = [
        ("WT1,WT2", 1.0),
        ("WT3", 1.1),
        ("LHCX1g1_a,LHCX1g1_b", 0.6),
        ("LHCX1g1_c", 0.55),
        ("LHCX1g2_a", 1.8),
        ("LHCX1g2_b,WT4", 1.4),
    ];

    for (i, (labels, quenching)) in samples.iter().enumerate() {
        let fm = 520.0 + rng.gauss(0.0, 15.0);
        let fo = 105.0 + rng.gauss(0.0, 4.0);
        let text = light_curve(labels, fm, fo, *quenching, &mut rng);
        let path = output_dir.join(format!("LC_{:02}_({}).CSV", i + 1, i + 1));
        std::fs::write(&path, text).expect("Failed to write export file");
    }
    std::fs::write(output_dir.join("notes.txt"), "not an export\n").expect("Failed to write notes");

    println!(
        "Wrote {} light curves ({} steps each) to {}",
        samples.len(),
        PAR_STEPS.len(),
        output_dir.display()
    );
}
