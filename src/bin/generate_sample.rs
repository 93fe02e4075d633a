use std::fs::create_dir_all;
use std::path::Path;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

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

fn main() {
    let subjects = ["Subj1", "Subj2", "Subj3", "Subj4", "Subj5", "Subj6"];
    let tasks = ["view", "listen"];
    // Peak pupil dilation per emotion (z-scored units).
    let emotion_peaks = [
        ("neutral", 0.30),
        ("happy", 0.55),
        ("sad", 0.50),
        ("angry", 0.85),
    ];

    // 150 bins of 20 ms → 0..3000 ms; dilation peaks mid-trial.
    let n_bins = 150usize;
    let bin_ms = 20.0;
    let peak_ms = 1400.0;
    let peak_sigma_ms = 450.0;

    let out_root = Path::new("sample_data");

    for (subj_idx, subject) in subjects.iter().enumerate() {
        let mut rng = SimpleRng::new(42 + subj_idx as u64);

        let dir = out_root.join(subject).join("averages");
        create_dir_all(&dir).expect("Failed to create output directory");
        let path = dir.join(format!("grand_averages_{subject}.csv"));

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_path(&path)
            .expect("Failed to create output file");

        let mut header = vec!["time_bin".to_string()];
        for task in &tasks {
            for (emotion, _) in &emotion_peaks {
                header.push(format!("{task}+{emotion}"));
            }
        }
        writer.write_record(&header).expect("Failed to write header");

        // Per-subject responsiveness so subjects differ.
        let subject_gain = 0.8 + 0.1 * subj_idx as f64;

        for bin in 0..n_bins {
            let t_ms = bin as f64 * bin_ms;
            let mut record = vec![bin.to_string()];

            for (task_idx, _task) in tasks.iter().enumerate() {
                for (_, peak) in &emotion_peaks {
                    // Roughly 1% dropped samples and 1% blink artifacts.
                    let roll = rng.next_f64();
                    if roll < 0.01 {
                        record.push(String::new());
                        continue;
                    }
                    let value = if roll < 0.02 {
                        if rng.next_f64() < 0.5 { 5.0 } else { -5.0 }
                    } else {
                        let task_gain = 1.0 - 0.15 * task_idx as f64;
                        subject_gain * task_gain * gaussian(t_ms, peak_ms, peak_sigma_ms, *peak)
                            + rng.gauss(0.0, 0.05)
                    };
                    record.push(format!("{value:.4}"));
                }
            }
            writer.write_record(&record).expect("Failed to write row");
        }
        writer.flush().expect("Failed to flush CSV");

        println!(
            "Wrote {} bins x {} conditions to {}",
            n_bins,
            tasks.len() * emotion_peaks.len(),
            path.display()
        );
    }
}
