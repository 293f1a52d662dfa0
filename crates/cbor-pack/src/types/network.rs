//! [`IpNetwork`]: an address prefix (tag 261).

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::InvalidValue;

/// An IP network: a network address plus prefix length.
///
/// Host bits below the prefix are cleared on construction, so
/// `192.168.1.7/24` becomes `192.168.1.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNetwork {
    address: IpAddr,
    prefix_len: u8,
}

impl IpNetwork {
    pub fn new(address: IpAddr, prefix_len: u8) -> Result<Self, InvalidValue> {
        let max = max_prefix_len(&address);
        if prefix_len > max {
            return Err(InvalidValue::PrefixTooLong { prefix_len, max });
        }
        let address = match address {
            IpAddr::V4(v4) => {
                let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
                IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
            }
            IpAddr::V6(v6) => {
                let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
                IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
            }
        };
        Ok(Self {
            address,
            prefix_len,
        })
    }

    pub fn network_address(&self) -> IpAddr {
        self.address
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }
}

fn max_prefix_len(address: &IpAddr) -> u8 {
    match address {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

impl FromStr for IpNetwork {
    type Err = InvalidValue;

    /// Parses `address/prefix`; a bare address is a single-host network.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidValue::MalformedNetwork(s.to_owned());
        let (address, prefix) = match s.split_once('/') {
            Some((address, prefix)) => (address, Some(prefix)),
            None => (s, None),
        };
        let address: IpAddr = address.parse().map_err(|_| malformed())?;
        let prefix_len = match prefix {
            Some(prefix) => prefix.parse::<u8>().map_err(|_| malformed())?,
            None => max_prefix_len(&address),
        };
        Self::new(address, prefix_len)
    }
}
