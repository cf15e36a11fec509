//! Token usage tracking for model requests.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Token usage for one request, or summed over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of model requests.
    pub requests: u32,
    /// Tokens in the prompt.
    pub input_tokens: u64,
    /// Tokens in the completion.
    pub output_tokens: u64,
}

impl Usage {
    /// Create a new empty usage record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Usage of a single request.
    #[must_use]
    pub fn with_tokens(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            requests: 1,
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, other: Self) {
        self.requests += other.requests;
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate() {
        let mut usage = Usage::new();
        usage += Usage::with_tokens(100, 50);
        usage += Usage::with_tokens(10, 5);

        assert_eq!(usage.requests, 2);
        assert_eq!(usage.total_tokens(), 165);
    }
}
