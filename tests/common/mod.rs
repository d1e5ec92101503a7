//! Shared generators for the property tests

#![allow(dead_code)]

use chainmap::Strand;
use proptest::prelude::*;

/// A well-formed chain whose header spans agree with its steps
#[derive(Debug, Clone)]
pub struct ChainSpec {
    pub score: i64,
    pub target_name: String,
    pub target_size: u64,
    pub target_start: u64,
    pub query_name: String,
    pub query_size: u64,
    pub query_strand: Strand,
    pub query_start: u64,
    pub id: u64,
    /// (size, dt, dq); the last one always has zero gaps
    pub steps: Vec<(u64, u64, u64)>,
}

impl ChainSpec {
    pub fn target_end(&self) -> u64 {
        self.target_start + self.steps.iter().map(|(s, dt, _)| s + dt).sum::<u64>()
    }

    pub fn query_end(&self) -> u64 {
        self.query_start + self.steps.iter().map(|(s, _, dq)| s + dq).sum::<u64>()
    }

    pub fn header_line(&self) -> String {
        format!(
            "chain {} {} {} + {} {} {} {} {} {} {} {}",
            self.score,
            self.target_name,
            self.target_size,
            self.target_start,
            self.target_end(),
            self.query_name,
            self.query_size,
            self.query_strand,
            self.query_start,
            self.query_end(),
            self.id,
        )
    }

    /// Chain text: tab-separated steps, single-value last step, trailing blank line
    pub fn text(&self) -> String {
        let mut out = self.header_line();
        out.push('\n');
        let last = self.steps.len() - 1;
        for (i, (size, dt, dq)) in self.steps.iter().enumerate() {
            if i == last {
                out.push_str(&format!("{}\n", size));
            } else {
                out.push_str(&format!("{}\t{}\t{}\n", size, dt, dq));
            }
        }
        out.push('\n');
        out
    }
}

/// Generate a valid chromosome name
pub fn arb_chrom_name() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u8..=22).prop_map(|n| format!("chr{}", n)),
        Just("chrX".to_string()),
        Just("chrY".to_string()),
        Just("chrM".to_string()),
        (1u8..=22).prop_map(|n| format!("{}", n)),
        Just("scaffold_12".to_string()),
    ]
}

/// Generate a valid strand
pub fn arb_strand() -> impl Strategy<Value = Strand> {
    prop_oneof![Just(Strand::Plus), Just(Strand::Minus)]
}

/// Generate a consistent forward-target chain
pub fn arb_chain() -> impl Strategy<Value = ChainSpec> {
    (
        0i64..100_000,
        arb_chrom_name(),
        0u64..1_000_000,
        0u64..10_000,
        arb_chrom_name(),
        arb_strand(),
        0u64..1_000_000,
        0u64..10_000,
        1u64..100_000,
        prop::collection::vec((1u64..500, 0u64..200, 0u64..200), 1..8),
    )
        .prop_map(
            |(score, target_name, target_start, t_pad, query_name, query_strand, query_start, q_pad, id, mut steps)| {
                if let Some(last) = steps.last_mut() {
                    last.1 = 0;
                    last.2 = 0;
                }
                let mut spec = ChainSpec {
                    score,
                    target_name,
                    target_size: 0,
                    target_start,
                    query_name,
                    query_size: 0,
                    query_strand,
                    query_start,
                    id,
                    steps,
                };
                spec.target_size = spec.target_end() + t_pad;
                spec.query_size = spec.query_end() + q_pad;
                spec
            },
        )
}
