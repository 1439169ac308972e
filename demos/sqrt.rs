use timed_block::{black_box, profile, Profiler};

// Babylonian method
fn sqrt_iterative(n: f32) -> f32 {
    let mut x = n;
    // bounded: rounding can make the last two guesses alternate
    for _ in 0..64 {
        let next = (x + n / x) / 2.0;
        let diff = x - next;
        x = next;
        if diff == 0.0 {
            break;
        }
    }
    x
}

// halve the exponent by bit manipulation
fn sqrt_approx(z: f32) -> f32 {
    let mut bits = z.to_bits() as i32;
    bits -= 1 << 23;
    bits >>= 1;
    bits += 1 << 29;
    f32::from_bits(bits as u32)
}

fn main() {
    env_logger::init();
    // <- ... init code we don't want to measure
    let mut p = Profiler::from_env();
    let (mut v0, mut v1, mut v2) = (10_000f32, 10_000f32, 10_000f32);

    // the first block is the reference for the summary
    profile!(p, "f32::sqrt" => {
        v2 = black_box(v2.sqrt() + 13.0);
    });
    profile!(p, "sqrt_iterative" => {
        v0 = black_box(sqrt_iterative(v0) + 13.0);
    });
    profile!(p, "sqrt_approx" => {
        v1 = black_box(sqrt_approx(v1) + 13.0);
    });

    p.summarize();
    println!("result {}", v0 + v1 + v2)
}
