use anyhow::{Context, Result};

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_data.csv".to_string());

    let mut rng = SimpleRng::new(42);

    let regions = ["North", "South", "East", "West"];
    let products = ["Widget", "Gadget", "Gizmo"];
    // (product, base price)
    let base_prices = [("Widget", 12.5), ("Gadget", 30.0), ("Gizmo", 7.25)];

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer
        .write_record(["order_id", "region", "product", "units", "unit_price", "discount", "revenue"])
        .context("writing header")?;

    let n_rows = 200;
    for order_id in 0..n_rows {
        let region = rng.pick(&regions);
        let product = rng.pick(&products);
        let base = base_prices
            .iter()
            .find(|(name, _)| *name == product)
            .map_or(10.0, |(_, p)| *p);

        let units = rng.gauss(20.0, 6.0).round().max(1.0) as u32;
        let unit_price = (base * (1.0 + rng.gauss(0.0, 0.05))).max(0.5);
        // Roughly one order in ten has no recorded discount.
        let discount = (rng.next_f64() >= 0.1).then(|| (rng.next_f64() * 0.3 * 100.0).round() / 100.0);
        let revenue = units as f64 * unit_price * (1.0 - discount.unwrap_or(0.0));

        writer
            .write_record([
                order_id.to_string(),
                region.to_string(),
                product.to_string(),
                units.to_string(),
                format!("{unit_price:.2}"),
                discount.map(|d| format!("{d:.2}")).unwrap_or_default(),
                format!("{revenue:.2}"),
            ])
            .with_context(|| format!("writing order {order_id}"))?;
    }
    writer.flush().context("flushing output")?;

    log::info!("Wrote {n_rows} orders to {output_path}");
    println!("Wrote {n_rows} orders to {output_path}");
    Ok(())
}
