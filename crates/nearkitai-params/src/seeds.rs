//! Bootstrap seed address materialization
//!
//! A node only leans on hardcoded seeds until it learns fresher addresses
//! from live peers. Seed entries are therefore backdated to between one and
//! two weeks ago so the address manager drops them as soon as anything
//! newer shows up.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Seconds in one week
pub const ONE_WEEK: i64 = 7 * 24 * 60 * 60;

/// A bootstrap peer endpoint with a synthetic last-seen time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAddress {
    /// Peer endpoint
    pub addr: SocketAddr,
    /// Synthetic last-seen time (Unix epoch seconds)
    pub last_seen: i64,
}

/// Reverse the byte order of one packed seed entry
///
/// The hardcoded tables store each IPv4 address with its four bytes
/// reversed relative to how it is read back. The reversal is a property of
/// how the tables were generated and is independent of host endianness.
pub fn swap_packed(value: u32) -> u32 {
    value.swap_bytes()
}

/// Decode one packed seed entry into an IPv4 address
pub fn unpack_seed(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(swap_packed(value).to_le_bytes())
}

fn backdated_last_seen<R: Rng>(rng: &mut R, now: i64) -> i64 {
    now - rng.gen_range(0..ONE_WEEK) - ONE_WEEK
}

/// Materialize a network's packed seed table
pub fn from_packed(packed: &[u32], port: u16) -> Vec<SeedAddress> {
    let now = Utc::now().timestamp();
    let mut rng = rand::thread_rng();
    packed
        .iter()
        .map(|&value| SeedAddress {
            addr: SocketAddr::V4(SocketAddrV4::new(unpack_seed(value), port)),
            last_seen: backdated_last_seen(&mut rng, now),
        })
        .collect()
}

/// Materialize a network's hardcoded dotted-quad seed list
pub fn from_literals(ips: &[&str], port: u16) -> Result<Vec<SeedAddress>> {
    let now = Utc::now().timestamp();
    let mut rng = rand::thread_rng();
    ips.iter()
        .map(|ip| {
            let parsed: Ipv4Addr = ip
                .parse()
                .map_err(|_| Error::InvalidSeedAddress((*ip).to_string()))?;
            Ok(SeedAddress {
                addr: SocketAddr::V4(SocketAddrV4::new(parsed, port)),
                last_seen: backdated_last_seen(&mut rng, now),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unpack_known_seed() {
        assert_eq!(unpack_seed(0xcebd55c5), Ipv4Addr::new(206, 189, 85, 197));
        assert_eq!(unpack_seed(0x44b7bc8b), Ipv4Addr::new(68, 183, 188, 139));
    }

    #[test]
    fn test_from_packed_uses_network_port() {
        let seeds = from_packed(&[0xcebd55c5], 12040);
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].addr, "206.189.85.197:12040".parse().unwrap());
    }

    #[test]
    fn test_from_literals_rejects_garbage() {
        let err = from_literals(&["not-an-address"], 12040).unwrap_err();
        assert!(matches!(err, Error::InvalidSeedAddress(_)));
    }

    #[test]
    fn test_last_seen_is_between_one_and_two_weeks_ago() {
        let before = Utc::now().timestamp();
        let seeds = from_literals(&["206.189.85.197", "68.183.188.139"], 12040).unwrap();
        let after = Utc::now().timestamp();
        for seed in &seeds {
            assert!(seed.last_seen >= before - 2 * ONE_WEEK);
            assert!(seed.last_seen <= after - ONE_WEEK);
        }
    }

    proptest! {
        #[test]
        fn swap_round_trips(value in any::<u32>()) {
            prop_assert_eq!(swap_packed(swap_packed(value)), value);
        }

        #[test]
        fn unpacked_octets_are_the_reversed_packed_bytes(value in any::<u32>()) {
            let bytes = value.to_le_bytes();
            let octets = unpack_seed(value).octets();
            prop_assert_eq!(octets, [bytes[3], bytes[2], bytes[1], bytes[0]]);
        }
    }
}
