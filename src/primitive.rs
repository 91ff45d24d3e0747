//! Primitive generators: integers, large integers, doubles, booleans,
//! characters, strings, symbols, keywords, UUIDs and ratios.

use crate::data::{Seed, Size};
use crate::gen::Gen;
use crate::tree::Tree;

/// The halving shrink sequence: `value - value/2`, `value - value/4`, ...
/// until the divisor truncates to zero. Every candidate has a strictly
/// smaller absolute value than `value` for nonzero `value` (Rust's `/`
/// on signed integers truncates toward zero, which is exactly what makes
/// this converge correctly for negative values too).
fn halves(value: i64) -> Vec<i64> {
    let mut out = Vec::new();
    let mut divisor = value;
    loop {
        divisor /= 2;
        if divisor == 0 {
            break;
        }
        out.push(value - divisor);
    }
    out
}

/// Build the shrink tree for an integer already known to lie in
/// `[lower, upper]`: each child is a halving step clamped back into
/// range, and children's children are computed by the same rule.
fn shrink_integer_towards(value: i64, lower: i64, upper: i64) -> Tree<i64> {
    Tree::new(value, move || {
        let candidates: Vec<i64> = halves(value)
            .into_iter()
            .map(|c| c.clamp(lower, upper))
            .filter(|c| *c != value)
            .collect();
        Box::new(
            candidates
                .into_iter()
                .map(move |c| shrink_integer_towards(c, lower, upper)),
        )
    })
}

/// Uniform 64-bit integer in `[lower, upper]`, shrinking via halves
/// toward zero (clamped back into range).
pub fn choose(lower: i64, upper: i64) -> Gen<i64> {
    assert!(lower <= upper, "choose: lower must be <= upper");
    Gen::new(move |_size, seed| {
        let span = (upper as i128 - lower as i128 + 1) as u128;
        let (raw, _) = seed.next_u64();
        let offset = (raw as u128 * span >> 64) as i64;
        let value = (lower as i128 + offset as i128).clamp(lower as i128, upper as i128) as i64;
        shrink_integer_towards(value, lower, upper)
    })
}

/// Integers whose magnitude scales with the size knob, centered on zero.
pub fn int() -> Gen<i64> {
    Gen::new(|size, seed| {
        let bound = (size.get() as i64).max(1);
        choose(-bound, bound).generate(size, seed)
    })
}

/// Integers in a caller-supplied range, ignoring size.
pub fn int_range(lower: i64, upper: i64) -> Gen<i64> {
    choose(lower, upper)
}

/// Generates across the full platform integer range with size-scaled
/// magnitude: sample a bit count in `[1, min(size, 64)]`, draw that many
/// top bits of a raw 64-bit value, then reflect the result into
/// `[min, max]` by repeated negate-and-shift.
pub fn large_integer(min: i64, max: i64) -> Gen<i64> {
    assert!(min <= max, "large_integer: min must be <= max");
    let base = Gen::new(move |size, seed| {
        let max_bits = size.get().clamp(1, 64) as u64;
        let (offset, seed) = seed.next_bounded(max_bits);
        let bit_count = (offset + 1) as usize;
        let (raw, _) = seed.next_u64();
        let mut value = (raw >> (64 - bit_count)) as i64;
        while value < min || value > max {
            if value == 0 {
                break;
            }
            value = -value >> 1;
        }
        let clamped = value.clamp(min, max);
        shrink_integer_towards(clamped, min, max)
    });
    crate::combinator::such_that(move |v: &i64| *v >= min && *v <= max, base, 10)
}

fn reverse_bits_n(value: u64, bits: usize) -> u64 {
    let mut v = value;
    let mut r = 0u64;
    for _ in 0..bits {
        r = (r << 1) | (v & 1);
        v >>= 1;
    }
    r
}

fn shrink_double(value: f64, min: f64, max: f64) -> Tree<f64> {
    Tree::new(value, move || {
        let mut candidates = Vec::new();
        if value.is_finite() && value != 0.0 {
            let halved = (value / 2.0).clamp(min, max);
            if halved != value {
                candidates.push(halved);
            }
            if min <= 0.0 && 0.0 <= max {
                candidates.push(0.0);
            }
        }
        candidates.dedup_by(|a, b| a == b);
        Box::new(
            candidates
                .into_iter()
                .filter(move |c| *c != value)
                .map(move |c| shrink_double(c, min, max)),
        )
    })
}

/// A finite IEEE-754 double in `[min, max]`.
///
/// The exponent window narrows around zero at small sizes, and the
/// significand is drawn as a size-bounded integer then bit-reversed so
/// that shrinking the significand toward zero clears low-order mantissa
/// bits first — the "simpler" direction for a floating point number.
pub fn f64_range(min: f64, max: f64) -> Gen<f64> {
    assert!(min <= max, "f64_range: min must be <= max");
    Gen::new(move |size, seed| {
        let window = 2f64.powf((size.get().min(200) as f64) / 8.0);
        let half_window = (window as i64).clamp(1, 1023);
        let (exp_u, seed) = seed.next_bounded((2 * half_window + 1) as u64);
        let exp = exp_u as i64 - half_window;

        let (sign_is_negative, seed) = seed.next_bool();
        let sign = if sign_is_negative { -1.0 } else { 1.0 };

        let bit_count = size.get().clamp(1, 52);
        let (raw_significand, _) = seed.next_bounded(1u64 << bit_count);
        let reversed = reverse_bits_n(raw_significand, 52);
        let significand = reversed as f64 / (1u64 << 52) as f64;

        let mut value = (1.0 + significand) * 2f64.powi(exp as i32) * sign;
        if !value.is_finite() || value < min || value > max {
            value = value.clamp(min, max);
        }
        shrink_double(value, min, max)
    })
}

/// Which non-finite/signed-zero special values [`double`] is allowed to
/// mix in alongside ordinary finite doubles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleOpts {
    pub allow_neg_zero: bool,
    pub allow_infinities: bool,
    pub allow_nan: bool,
}

impl Default for DoubleOpts {
    fn default() -> Self {
        DoubleOpts {
            allow_neg_zero: true,
            allow_infinities: true,
            allow_nan: true,
        }
    }
}

/// A 64-bit double in `[min, max]`, [`frequency`](crate::combinator::frequency)-mixed
/// with small chances of `0.0`, `-0.0`, `+inf`, `-inf` and `NaN` — the
/// specials each `opts` allows and `[min, max]` admits. Finite values carry
/// the full shrink tree from [`f64_range`]; the specials are leaves, since
/// none of them has a meaningfully "smaller" variant.
pub fn double_with_opts(min: f64, max: f64, opts: DoubleOpts) -> Gen<f64> {
    assert!(min <= max, "double_with_opts: min must be <= max");
    let mut weighted: Vec<(u32, Gen<f64>)> = vec![(20, f64_range(min, max))];

    if min <= 0.0 && 0.0 <= max {
        weighted.push((1, Gen::pure(0.0)));
        if opts.allow_neg_zero {
            weighted.push((1, Gen::pure(-0.0)));
        }
    }
    if opts.allow_infinities {
        if max == f64::INFINITY {
            weighted.push((1, Gen::pure(f64::INFINITY)));
        }
        if min == f64::NEG_INFINITY {
            weighted.push((1, Gen::pure(f64::NEG_INFINITY)));
        }
    }
    if opts.allow_nan {
        weighted.push((1, Gen::pure(f64::NAN)));
    }

    crate::combinator::frequency(weighted).expect("double_with_opts: non-empty, positive weights")
}

/// [`double_with_opts`] over the full double range with every special
/// value enabled — the default shape spec.md §4.5 describes.
pub fn double() -> Gen<f64> {
    double_with_opts(f64::NEG_INFINITY, f64::INFINITY, DoubleOpts::default())
}

/// A boolean that shrinks from `true` to `false`.
pub fn bool() -> Gen<bool> {
    Gen::new(|_size, seed| {
        let (b, _) = seed.next_bool();
        if b {
            Tree::with_children(true, vec![Tree::singleton(false)])
        } else {
            Tree::singleton(false)
        }
    })
}

/// A character in `[lower, upper]` by Unicode scalar value.
pub fn char_range(lower: u32, upper: u32) -> Gen<char> {
    choose(lower as i64, upper as i64).map(|v| char::from_u32(v as u32).unwrap_or('\u{FFFD}'))
}

pub fn ascii_alpha_char() -> Gen<char> {
    crate::combinator::one_of(vec![
        char_range('a' as u32, 'z' as u32),
        char_range('A' as u32, 'Z' as u32),
    ])
    .expect("non-empty choice list")
}

pub fn ascii_alphanumeric_char() -> Gen<char> {
    crate::combinator::one_of(vec![
        ascii_alpha_char(),
        char_range('0' as u32, '9' as u32),
    ])
    .expect("non-empty choice list")
}

pub fn ascii_printable_char() -> Gen<char> {
    char_range(0x20, 0x7e)
}

/// A string built from ASCII alphabetic characters.
pub fn ascii_alpha_string() -> Gen<String> {
    crate::combinator::vector(ascii_alpha_char()).map(|cs: Vec<char>| cs.into_iter().collect())
}

/// A string built from ASCII alphanumeric characters.
pub fn ascii_alphanumeric_string() -> Gen<String> {
    crate::combinator::vector(ascii_alphanumeric_char()).map(|cs: Vec<char>| cs.into_iter().collect())
}

fn looks_like_number(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some('+') | Some('-') => chars.next().map(|c| c.is_ascii_digit()).unwrap_or(false),
        Some(c) => c.is_ascii_digit(),
        None => false,
    }
}

/// A short identifier-like string: alphabetic, `-` and `_`, rejecting
/// anything that would parse as a number. Scaled by `n -> floor(n^0.46)`
/// so symbol names stay short even at large sizes.
pub fn symbol() -> Gen<String> {
    let name_char = crate::combinator::one_of(vec![
        ascii_alpha_char(),
        Gen::pure('-'),
        Gen::pure('_'),
    ])
    .expect("non-empty choice list");
    let shaped = crate::combinator::scale(
        |n| (n as f64).powf(0.46).floor() as usize,
        crate::combinator::vector(name_char),
    )
    .map(|cs: Vec<char>| cs.into_iter().collect::<String>())
    .map(|s: String| if s.is_empty() { "a".to_string() } else { s });
    crate::combinator::such_that(|s: &String| !looks_like_number(s), shaped, 10)
}

/// A namespaced-keyword-style string, e.g. `:foo`.
pub fn keyword() -> Gen<String> {
    symbol().map(|s| format!(":{s}"))
}

/// A type-4 UUID string. Does not shrink — a UUID has no smaller
/// variant that's meaningfully "simpler".
pub fn uuid() -> Gen<String> {
    Gen::new(|_size, seed| {
        let (hi, seed) = seed.next_u64();
        let (lo, _) = seed.next_u64();
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&hi.to_be_bytes());
        bytes[8..].copy_from_slice(&lo.to_be_bytes());
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        let s = format!(
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            bytes[8], bytes[9], bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15],
        );
        Tree::singleton(s)
    })
}

/// A rational number. The standard library has no rational type, so this
/// crate provides a minimal one rather than depending on `num-rational`
/// for a single generator — a deliberate, documented deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub numerator: i64,
    pub denominator: i64,
}

/// Numerator from [`int`]; denominator from [`int`] filtered to exclude
/// zero.
pub fn ratio() -> Gen<Ratio> {
    let denominator = crate::combinator::such_that(|d: &i64| *d != 0, int(), 10);
    int().bind(move |n| {
        denominator
            .clone()
            .map(move |d| Ratio {
                numerator: n,
                denominator: d,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choose_stays_in_bounds() {
        let gen = choose(5, 10);
        for i in 0..200u64 {
            let tree = gen.generate(Size::new(10), Seed::from_u64(i));
            assert!(tree.value >= 5 && tree.value <= 10);
            for child in tree.children() {
                assert!(child.value >= 5 && child.value <= 10);
            }
        }
    }

    #[test]
    fn choose_shrinks_have_smaller_magnitude() {
        let gen = choose(-1000, 1000);
        let tree = gen.generate(Size::new(50), Seed::from_u64(3));
        for child in tree.children() {
            assert!(child.value.abs() <= tree.value.abs());
        }
    }

    #[test]
    fn shrinking_is_finite() {
        let tree = shrink_integer_towards(1000, -1000, 1000);
        assert!(tree.count_nodes() < 10_000);
    }

    #[test]
    fn bool_shrinks_true_to_false() {
        let tree = bool().generate(Size::new(0), Seed::from_u64(2));
        if tree.value {
            let children: Vec<_> = tree.children().map(|t| t.value).collect();
            assert_eq!(children, vec![false]);
        }
    }

    #[test]
    fn symbol_never_looks_numeric() {
        for i in 0..200u64 {
            let s = symbol().generate(Size::new(20), Seed::from_u64(i)).value;
            assert!(!looks_like_number(&s), "symbol {s:?} looked numeric");
        }
    }

    #[test]
    fn uuid_has_no_shrinks() {
        let tree = uuid().generate(Size::new(30), Seed::from_u64(11));
        assert!(!tree.has_shrinks());
        assert_eq!(tree.value.len(), 36);
    }

    #[test]
    fn ratio_denominator_is_never_zero() {
        for i in 0..200u64 {
            let r = ratio().generate(Size::new(10), Seed::from_u64(i)).value;
            assert_ne!(r.denominator, 0);
        }
    }

    #[test]
    fn f64_range_stays_in_bounds() {
        for i in 0..200u64 {
            let v = f64_range(-5.0, 5.0)
                .generate(Size::new(20), Seed::from_u64(i))
                .value;
            assert!((-5.0..=5.0).contains(&v));
        }
    }

    #[test]
    fn f64_range_never_overflows_to_infinity_at_large_size() {
        for i in 0..200u64 {
            let v = f64_range(f64::MIN, f64::MAX)
                .generate(Size::new(200), Seed::from_u64(i))
                .value;
            assert!(v.is_finite(), "f64_range produced non-finite value {v}");
        }
    }

    #[test]
    fn double_can_produce_every_allowed_special() {
        let mut saw_nan = false;
        let mut saw_pos_inf = false;
        let mut saw_neg_inf = false;
        let mut saw_neg_zero = false;
        for i in 0..5000u64 {
            let v = double().generate(Size::new(30), Seed::from_u64(i)).value;
            saw_nan |= v.is_nan();
            saw_pos_inf |= v == f64::INFINITY;
            saw_neg_inf |= v == f64::NEG_INFINITY;
            saw_neg_zero |= v == 0.0 && v.is_sign_negative();
        }
        assert!(saw_nan, "double() never produced NaN over 5000 draws");
        assert!(saw_pos_inf, "double() never produced +inf over 5000 draws");
        assert!(saw_neg_inf, "double() never produced -inf over 5000 draws");
        assert!(saw_neg_zero, "double() never produced -0.0 over 5000 draws");
    }

    #[test]
    fn double_with_opts_respects_disabled_specials() {
        let opts = DoubleOpts {
            allow_neg_zero: false,
            allow_infinities: false,
            allow_nan: false,
        };
        for i in 0..2000u64 {
            let v = double_with_opts(-10.0, 10.0, opts)
                .generate(Size::new(30), Seed::from_u64(i))
                .value;
            assert!(v.is_finite());
            assert!(!(v == 0.0 && v.is_sign_negative()));
        }
    }
}
