use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// a macro to declare simple Vec<String>
#[macro_export]
macro_rules! string_vec {
    ($($x:expr),*) => {
        vec![$($x.into()),*]
    };
}

/// info! line, highlighted when the terminal display is colorful
#[macro_export]
macro_rules! cinfo {
    ($colorful:expr, $($arg:tt)+) => {
        if $colorful {
            log::info!("\x1b[1;96m{}\x1b[0m", format!($($arg)+));
        } else {
            log::info!($($arg)+);
        }
    };
}

/// A uniform permutation of 0..n
pub fn randomize_without_replacement(n: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices
}

/// Split `vec` into `k` randomly chosen elements and the rest, both keeping their original order
pub fn random_split<T: Clone>(vec: &[T], k: usize, rng: &mut ChaCha8Rng) -> (Vec<T>, Vec<T>) {
    let k = k.min(vec.len());
    let mut picked = vec![false; vec.len()];
    for i in randomize_without_replacement(vec.len(), rng).into_iter().take(k) {
        picked[i] = true;
    }

    let mut chosen = Vec::with_capacity(k);
    let mut rest = Vec::with_capacity(vec.len() - k);
    for (value, &is_picked) in vec.iter().zip(picked.iter()) {
        if is_picked {
            chosen.push(value.clone());
        } else {
            rest.push(value.clone());
        }
    }
    (chosen, rest)
}
