//! Utility functions for identifier text encoding

use bech32::{Bech32m, Hrp};

// encode raw identifier bytes using bech32m under the given human readable part
pub fn to_bech32(hrp: &str, bytes: &[u8]) -> anyhow::Result<String> {
    let hrp = Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, bytes)?;
    Ok(encode)
}

// decode a bech32 string, rejecting any human readable part other than `expected`
pub fn from_bech32(expected: &str, encoded: &str) -> anyhow::Result<Vec<u8>> {
    let (hrp, data) = bech32::decode(encoded)?;
    if hrp.as_str() != expected {
        anyhow::bail!("expected `{expected}` prefix, found `{}`", hrp.as_str());
    }
    Ok(data)
}
