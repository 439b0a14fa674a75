use sha1::{Digest, Sha1};

/// SHA-1 of `input`'s UTF-8 bytes, rendered as 40 lowercase hex characters.
pub fn sha1_hex(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// A solution is valid iff its hash begins with `difficulty` `'0'` characters.
pub fn is_valid_solution(solution: &str, difficulty: u32) -> bool {
    let hash = sha1_hex(solution);
    leading_zeros(&hash) >= difficulty as usize
}

fn leading_zeros(hash: &str) -> usize {
    hash.chars().take_while(|&c| c == '0').count()
}

/// Forms the candidate string a mining worker hashes for a given nonce.
pub fn candidate(transaction_id: u64, nonce: u64) -> String {
    format!("{transaction_id}:{nonce}")
}
