use num_format::{Locale, ToFormattedString};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const SLIDING_WINDOW_SIZE: u64 = 2; // In seconds
const BATCH_SIZE: u64 = 1000;

static STOP: AtomicBool = AtomicBool::new(false);

// Padded to a cache line so that workers do not contend on each other's counters.
#[repr(C)]
#[derive(Default)]
struct WorkerStats {
    count: AtomicU64,
    padding: [u64; 15],
}

/// Runs `func` in a tight loop on every physical core but one and prints the
/// aggregate number of calls per second until Ctrl-C is pressed.
pub fn test_throughput<F>(func: F)
where
    F: Fn() + Sync + Send + 'static,
{
    if let Err(err) = ctrlc::set_handler(|| STOP.store(true, Ordering::SeqCst)) {
        eprintln!("Error setting Ctrl-C handler: {err}");
        return;
    }
    let num_threads = num_cpus::get_physical().max(2);
    println!("Number of threads: {num_threads}");

    let func = Arc::new(func);
    let stats: Arc<Vec<WorkerStats>> =
        Arc::new((0..num_threads).map(|_| WorkerStats::default()).collect());
    let mut handles = Vec::with_capacity(num_threads);

    let monitor_stats = Arc::clone(&stats);
    handles.push(thread::spawn(move || {
        let mut start_time = Instant::now();
        let mut total_count_old: u64 = 0;
        while !STOP.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(500));
            let elapsed = start_time.elapsed().as_secs();
            if elapsed < SLIDING_WINDOW_SIZE {
                continue;
            }
            let total_count: u64 = monitor_stats
                .iter()
                .map(|stat| stat.count.load(Ordering::Relaxed))
                .sum();
            let throughput = (total_count - total_count_old) / elapsed;
            total_count_old = total_count;
            println!(
                "Throughput: {} iterations/sec",
                throughput.to_formatted_string(&Locale::en)
            );
            start_time = Instant::now();
        }
    }));

    for thread_index in 0..num_threads - 1 {
        let stats = Arc::clone(&stats);
        let func = Arc::clone(&func);
        handles.push(thread::spawn(move || {
            while !STOP.load(Ordering::SeqCst) {
                for _ in 0..BATCH_SIZE {
                    func();
                }
                stats[thread_index]
                    .count
                    .fetch_add(BATCH_SIZE, Ordering::Relaxed);
            }
        }));
    }

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("A stress worker panicked");
        }
    }
}
