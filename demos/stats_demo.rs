use clap::Parser;
use clap::ValueEnum;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use robin_hash::ByteMap;
use robin_hash::Key;
use robin_hash::Ownership;
use robin_hash::ResizePolicy;
use robin_hash::Settings;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    Disabled,
    Grow,
    GrowAndShrink,
}

impl From<Policy> for ResizePolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Disabled => ResizePolicy::Disabled,
            Policy::Grow => ResizePolicy::GrowOnly,
            Policy::GrowAndShrink => ResizePolicy::GrowAndShrink,
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    /// Number of keys to insert.
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: usize,

    /// Percentage of the inserted keys to delete afterwards.
    #[arg(short = 'd', long = "delete_percent", default_value_t = 50)]
    delete_percent: u8,

    #[arg(short = 'p', long = "policy", value_enum, default_value_t = Policy::GrowAndShrink)]
    policy: Policy,

    /// Hash keys with ASCII case folded.
    #[arg(long = "ignore_case")]
    ignore_case: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long = "log_level", default_value = "debug")]
    log_level: String,
}

fn print_stats(map: &ByteMap<'_, u64>) {
    let stats = map.debug_stats();
    println!("  entries:      {}", stats.populated);
    println!("  capacity:     {}", stats.capacity);
    println!("  load factor:  {:.2}%", stats.load_factor * 100.0);
    println!("  mean probe:   {:.3}", stats.mean_probe_length);
    println!("  max probe:    {}", stats.max_probe_length);
    println!("  slot bytes:   {}", stats.total_bytes);

    println!("  probe histogram:");
    let hist = map.probe_histogram();
    let widest = hist.iter().copied().max().unwrap_or(0).max(1);
    for (distance, count) in hist.iter().enumerate() {
        let bar = "#".repeat(count * 50 / widest);
        println!("    {distance:>3} {count:>8} {bar}");
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);
    let settings = Settings::default()
        .with_ignore_case(args.ignore_case)
        .with_ownership(Ownership::KeyAndValue)
        .with_resize(args.policy.into());

    info!(?settings, entries = args.entries, "starting");

    let mut map = ByteMap::with_settings(settings);
    let mut rng = SmallRng::from_os_rng();
    let keys: Vec<Vec<u8>> = (0..args.entries)
        .map(|_| format!("key_{:016x}", rng.random::<u64>()).into_bytes())
        .collect();

    let mut failures = 0;
    for (i, key) in keys.iter().enumerate() {
        if let Err(err) = map.insert_key(Key::Owned(key.as_slice().into()), i as u64) {
            failures += 1;
            if failures == 1 {
                println!("First failed insert at entry {i}: {err}");
            }
        }
    }

    println!("After inserting {} keys:", keys.len());
    print_stats(&map);
    if failures > 0 {
        println!("  failed inserts: {failures}");
    }

    let to_delete = keys.len() * args.delete_percent.min(100) as usize / 100;
    for key in &keys[..to_delete] {
        let _ = map.delete(key);
    }

    println!("After deleting {to_delete} keys:");
    print_stats(&map);
}
