//! Time-ordered keys for pushed children.

use rand::Rng;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Alphabet in ascending ASCII order, so keys sort by creation time.
const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIME_CHARS: usize = 8;
const RANDOM_CHARS: usize = 12;

#[derive(Debug, Default)]
struct State {
    last_ms: i64,
    last_random: [u8; RANDOM_CHARS],
}

/// Generates 20-character push keys: 8 characters of timestamp followed by
/// 12 random characters. Keys generated within the same millisecond
/// increment the random part, so they stay strictly increasing.
#[derive(Debug, Default)]
pub struct PushIdGenerator {
    state: Mutex<State>,
}

impl PushIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next key using the system clock.
    pub fn next_id(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        self.next_id_at(now)
    }

    /// Next key for an explicit millisecond timestamp.
    pub fn next_id_at(&self, now_ms: i64) -> String {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if now_ms == state.last_ms {
            // Carry the increment through the random part.
            for digit in state.last_random.iter_mut().rev() {
                if *digit == 63 {
                    *digit = 0;
                } else {
                    *digit += 1;
                    break;
                }
            }
        } else {
            let mut rng = rand::thread_rng();
            for digit in state.last_random.iter_mut() {
                *digit = rng.gen_range(0..64);
            }
        }
        state.last_ms = now_ms;

        let mut id = String::with_capacity(TIME_CHARS + RANDOM_CHARS);
        let mut time = now_ms.max(0) as u64;
        let mut time_chars = [0u8; TIME_CHARS];
        for slot in time_chars.iter_mut().rev() {
            *slot = PUSH_CHARS[(time % 64) as usize];
            time /= 64;
        }
        id.extend(time_chars.iter().map(|b| *b as char));
        id.extend(state.last_random.iter().map(|d| PUSH_CHARS[*d as usize] as char));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_alphabet() {
        let id = PushIdGenerator::new().next_id();
        assert_eq!(id.len(), 20);
        assert!(id.bytes().all(|b| PUSH_CHARS.contains(&b)));
    }

    #[test]
    fn test_ordered_across_milliseconds() {
        let generator = PushIdGenerator::new();
        let a = generator.next_id_at(1_700_000_000_000);
        let b = generator.next_id_at(1_700_000_000_001);
        assert!(a < b);
    }

    #[test]
    fn test_ordered_within_millisecond() {
        let generator = PushIdGenerator::new();
        let ids: Vec<String> = (0..100).map(|_| generator.next_id_at(42)).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }
}
