use log::debug;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::time::Instant;

use crate::error::CalcError;
use crate::types::with_metadata;
use crate::types::ComputationOutput;
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An IPv4 address with its prefix given as a length, a dotted mask, or in
/// CIDR notation on the address itself (`10.0.0.7/8`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetInput {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressClass {
    A,
    B,
    C,
    D,
    E,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetOutput {
    pub address: Ipv4Addr,
    pub prefix_length: u8,
    pub cidr: String,
    pub network: Ipv4Addr,
    pub broadcast: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub wildcard: Ipv4Addr,
    pub first_host: Ipv4Addr,
    pub last_host: Ipv4Addr,
    pub total_addresses: u64,
    pub usable_hosts: u64,
    pub class: AddressClass,
    pub is_private: bool,
    pub binary_netmask: String,
}

// ---------------------------------------------------------------------------
// Bit arithmetic
// ---------------------------------------------------------------------------

fn mask_from_prefix(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix)
    }
}

/// Prefix length of a dotted mask; `None` when the one bits are not contiguous.
fn prefix_from_mask(mask: Ipv4Addr) -> Option<u8> {
    let bits = u32::from(mask);
    let ones = bits.leading_ones();
    (ones + bits.trailing_zeros() == 32).then_some(ones as u8)
}

fn class_of(addr: Ipv4Addr) -> AddressClass {
    match addr.octets()[0] {
        0..=127 => AddressClass::A,
        128..=191 => AddressClass::B,
        192..=223 => AddressClass::C,
        224..=239 => AddressClass::D,
        _ => AddressClass::E,
    }
}

fn dotted_binary(bits: u32) -> String {
    bits.to_be_bytes()
        .iter()
        .map(|b| format!("{b:08b}"))
        .collect::<Vec<_>>()
        .join(".")
}

fn parse_addr(field: &str, s: &str) -> CalcResult<Ipv4Addr> {
    s.trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| CalcError::invalid(field, format!("'{s}' is not a valid IPv4 address")))
}

fn resolve_prefix(input: &SubnetInput) -> CalcResult<(Ipv4Addr, u8)> {
    let (addr_part, cidr_prefix) = match input.address.split_once('/') {
        Some((a, p)) => {
            let p = p
                .trim()
                .parse::<u8>()
                .map_err(|_| CalcError::invalid("address", "CIDR prefix must be 0-32"))?;
            (a, Some(p))
        }
        None => (input.address.as_str(), None),
    };
    let address = parse_addr("address", addr_part)?;

    let from_mask = match &input.netmask {
        Some(m) => {
            let mask = parse_addr("netmask", m)?;
            Some(prefix_from_mask(mask).ok_or_else(|| {
                CalcError::invalid("netmask", "Mask bits must be contiguous")
            })?)
        }
        None => None,
    };

    let given: Vec<u8> = [cidr_prefix, input.prefix_length, from_mask]
        .into_iter()
        .flatten()
        .collect();
    let prefix = match given.as_slice() {
        [] => {
            return Err(CalcError::InsufficientData(
                "A prefix length or netmask is required".into(),
            ))
        }
        [first, rest @ ..] => {
            if rest.iter().any(|p| p != first) {
                return Err(CalcError::invalid(
                    "prefix_length",
                    "Prefix length and netmask disagree",
                ));
            }
            *first
        }
    };
    if prefix > 32 {
        return Err(CalcError::invalid("prefix_length", "Must be between 0 and 32"));
    }
    Ok((address, prefix))
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Network, broadcast and host range of an IPv4 subnet.
///
/// /31 point-to-point links use both addresses as hosts; a /32 is a single
/// host route.
pub fn calculate_subnet(input: &SubnetInput) -> CalcResult<ComputationOutput<SubnetOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (address, prefix) = resolve_prefix(input)?;
    let mask = mask_from_prefix(prefix);
    let ip = u32::from(address);
    let network = ip & mask;
    let broadcast = network | !mask;
    let total_addresses = 1u64 << (32 - u32::from(prefix));

    let (first_host, last_host, usable_hosts) = match prefix {
        32 => (network, network, 1),
        31 => (network, broadcast, 2),
        _ => (network + 1, broadcast - 1, total_addresses - 2),
    };

    if prefix < 31 && (ip == network || ip == broadcast) {
        warnings.push(format!(
            "{address} is the {} address, not a usable host",
            if ip == network { "network" } else { "broadcast" }
        ));
    }

    let class = class_of(address);
    if matches!(class, AddressClass::D | AddressClass::E) {
        warnings.push("Multicast and reserved ranges are not normally subnetted".into());
    }

    debug!("subnet {address}/{prefix} network={}", Ipv4Addr::from(network));

    let output = SubnetOutput {
        address,
        prefix_length: prefix,
        cidr: format!("{}/{prefix}", Ipv4Addr::from(network)),
        network: Ipv4Addr::from(network),
        broadcast: Ipv4Addr::from(broadcast),
        netmask: Ipv4Addr::from(mask),
        wildcard: Ipv4Addr::from(!mask),
        first_host: Ipv4Addr::from(first_host),
        last_host: Ipv4Addr::from(last_host),
        total_addresses,
        usable_hosts,
        class,
        is_private: address.is_private(),
        binary_netmask: dotted_binary(mask),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "IPv4 subnet bit arithmetic",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subnet(address: &str, prefix: Option<u8>, mask: Option<&str>) -> SubnetInput {
        SubnetInput {
            address: address.into(),
            prefix_length: prefix,
            netmask: mask.map(str::to_string),
        }
    }

    #[test]
    fn test_slash_24() {
        let out = calculate_subnet(&subnet("192.168.1.42", Some(24), None))
            .unwrap()
            .result;
        assert_eq!(out.network, Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(out.broadcast, Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(out.netmask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(out.wildcard, Ipv4Addr::new(0, 0, 0, 255));
        assert_eq!(out.first_host, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(out.last_host, Ipv4Addr::new(192, 168, 1, 254));
        assert_eq!(out.total_addresses, 256);
        assert_eq!(out.usable_hosts, 254);
        assert_eq!(out.class, AddressClass::C);
        assert!(out.is_private);
        assert_eq!(out.binary_netmask, "11111111.11111111.11111111.00000000");
    }

    #[test]
    fn test_netmask_and_cidr_forms_agree() {
        let by_mask = calculate_subnet(&subnet("10.20.30.40", None, Some("255.255.240.0")))
            .unwrap()
            .result;
        let by_cidr = calculate_subnet(&subnet("10.20.30.40/20", None, None))
            .unwrap()
            .result;
        assert_eq!(by_mask.prefix_length, 20);
        assert_eq!(by_mask.network, by_cidr.network);
        assert_eq!(by_mask.network, Ipv4Addr::new(10, 20, 16, 0));
        assert_eq!(by_mask.broadcast, Ipv4Addr::new(10, 20, 31, 255));
    }

    #[test]
    fn test_point_to_point_and_host_route() {
        let p2p = calculate_subnet(&subnet("203.0.113.9", Some(31), None))
            .unwrap()
            .result;
        assert_eq!(p2p.usable_hosts, 2);
        assert_eq!(p2p.first_host, Ipv4Addr::new(203, 0, 113, 8));
        assert_eq!(p2p.last_host, Ipv4Addr::new(203, 0, 113, 9));
        assert!(!p2p.is_private);

        let host = calculate_subnet(&subnet("8.8.8.8", Some(32), None))
            .unwrap()
            .result;
        assert_eq!(host.usable_hosts, 1);
        assert_eq!(host.first_host, host.last_host);
    }

    #[test]
    fn test_slash_zero() {
        let out = calculate_subnet(&subnet("1.2.3.4", Some(0), None))
            .unwrap()
            .result;
        assert_eq!(out.total_addresses, 1u64 << 32);
        assert_eq!(out.network, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(out.broadcast, Ipv4Addr::new(255, 255, 255, 255));
    }

    #[test]
    fn test_network_address_warns() {
        let out = calculate_subnet(&subnet("172.16.0.0", Some(16), None)).unwrap();
        assert_eq!(out.result.class, AddressClass::B);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(calculate_subnet(&subnet("300.1.1.1", Some(24), None)).is_err());
        assert!(calculate_subnet(&subnet("10.0.0.1", Some(33), None)).is_err());
        assert!(calculate_subnet(&subnet("10.0.0.1", None, Some("255.0.255.0"))).is_err());
        assert!(calculate_subnet(&subnet("10.0.0.1", None, None)).is_err());
        assert!(calculate_subnet(&subnet("10.0.0.1/8", Some(16), None)).is_err());
    }
}
