//! Semantic tags: user tags, dates and times, decimals, rationals, regular
//! expressions, MIME messages, UUIDs and IP addresses.

use std::net::IpAddr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use malachite::base::num::basic::traits::Zero;
use malachite::{Integer, Rational};
use regex::Regex;
use uuid::Uuid;

use super::Encoder;
use crate::constants::*;
use crate::error::{EncodeError, InvalidValue};
use crate::types::{Decimal, IpNetwork, MimeMessage, Tag};

/// ISO 8601 with microseconds only when present and `Z` for UTC.
fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    let mut out = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
    let micros = dt.nanosecond() % 1_000_000_000 / 1_000;
    if micros != 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    let offset = dt.offset().local_minus_utc();
    if offset == 0 {
        out.push('Z');
        return out;
    }
    let sign = if offset < 0 { '-' } else { '+' };
    let abs = offset.unsigned_abs();
    out.push_str(&format!("{sign}{:02}:{:02}", abs / 3600, abs / 60 % 60));
    if abs % 60 != 0 {
        out.push_str(&format!(":{:02}", abs % 60));
    }
    out
}

fn ip_bytes(addr: &IpAddr) -> Vec<u8> {
    match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

impl Encoder<'_> {
    /// Writes a tag header and its payload. Tag 256 additionally scopes a
    /// fresh string reference table to the payload.
    pub fn encode_semantic(&mut self, tag: &Tag) -> Result<(), EncodeError> {
        if tag.tag() == TAG_STRINGREF_NAMESPACE {
            let pending = std::mem::replace(&mut self.namespace_pending, false);
            let result = self.with_string_namespace(|e| e.encode(tag.value()));
            self.namespace_pending = pending;
            return result;
        }
        self.encode_length(MAJOR_TAG, tag.tag());
        self.encode(tag.value())
    }

    /// Tag 1 epoch seconds or tag 0 string, by `datetime_as_timestamp`.
    pub fn encode_datetime(&mut self, dt: &DateTime<FixedOffset>) -> Result<(), EncodeError> {
        if self.options.datetime_as_timestamp {
            self.encode_length(MAJOR_TAG, TAG_EPOCH_DATETIME);
            let seconds = dt.timestamp();
            let micros = dt.timestamp_subsec_micros() % 1_000_000;
            if micros == 0 {
                self.encode_int(seconds);
            } else {
                self.encode_float_value(seconds as f64 + f64::from(micros) / 1_000_000.0);
            }
        } else {
            self.encode_length(MAJOR_TAG, TAG_DATETIME_STRING);
            self.encode_str(&format_datetime(dt));
        }
        Ok(())
    }

    /// Attaches the default timezone, failing if none is configured.
    pub fn encode_naive_datetime(&mut self, dt: &NaiveDateTime) -> Result<(), EncodeError> {
        let aware = self
            .options
            .default_timezone
            .and_then(|tz| dt.and_local_timezone(tz).single())
            .ok_or_else(|| InvalidValue::NaiveDateTime(dt.to_string()))?;
        self.encode_datetime(&aware)
    }

    /// Tag 100 epoch days or tag 1004 string, or a midnight datetime when
    /// `date_as_datetime` is set.
    pub fn encode_date(&mut self, date: &NaiveDate) -> Result<(), EncodeError> {
        if self.options.date_as_datetime {
            return self.encode_naive_datetime(&date.and_time(NaiveTime::MIN));
        }
        if self.options.datetime_as_timestamp {
            self.encode_length(MAJOR_TAG, TAG_EPOCH_DATE);
            self.encode_int(i64::from(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE));
        } else {
            self.encode_length(MAJOR_TAG, TAG_DATE_STRING);
            self.encode_str(&date.format("%Y-%m-%d").to_string());
        }
        Ok(())
    }

    /// Tag 4 `[exponent, significand]`; the specials use the half-float
    /// NaN and infinity patterns.
    pub fn encode_decimal(&mut self, decimal: &Decimal) {
        match decimal {
            Decimal::NaN => self.encode_float(f64::NAN),
            Decimal::Infinity => self.encode_float(f64::INFINITY),
            Decimal::NegInfinity => self.encode_float(f64::NEG_INFINITY),
            Decimal::Finite {
                significand,
                exponent,
            } => {
                self.encode_length(MAJOR_TAG, TAG_DECIMAL_FRACTION);
                self.encode_length(MAJOR_ARR, 2);
                self.encode_int(*exponent);
                self.encode_big_int(significand);
            }
        }
    }

    /// Tag 30 `[numerator, denominator]`, sign on the numerator.
    pub fn encode_rational(&mut self, rational: &Rational) {
        let magnitude = Integer::from(rational.numerator_ref());
        let numerator = if *rational < Rational::ZERO {
            -magnitude
        } else {
            magnitude
        };
        self.encode_length(MAJOR_TAG, TAG_RATIONAL);
        self.encode_length(MAJOR_ARR, 2);
        self.encode_big_int(&numerator);
        self.encode_big_int(&Integer::from(rational.denominator_ref()));
    }

    pub fn encode_regex(&mut self, re: &Regex) {
        self.encode_length(MAJOR_TAG, TAG_REGEXP);
        self.encode_str(re.as_str());
    }

    pub fn encode_mime(&mut self, message: &MimeMessage) {
        self.encode_length(MAJOR_TAG, TAG_MIME);
        self.encode_str(&message.as_string());
    }

    pub fn encode_uuid(&mut self, uuid: &Uuid) {
        self.encode_length(MAJOR_TAG, TAG_UUID);
        self.encode_bytes(uuid.as_bytes());
    }

    pub fn encode_ip_address(&mut self, addr: &IpAddr) {
        self.encode_length(MAJOR_TAG, TAG_IP_ADDRESS);
        self.encode_bytes(&ip_bytes(addr));
    }

    /// Tag 261 over a one-entry map `{network address: prefix length}`.
    pub fn encode_ip_network(&mut self, network: &IpNetwork) {
        self.encode_length(MAJOR_TAG, TAG_IP_NETWORK);
        self.encode_length(MAJOR_MAP, 1);
        self.encode_bytes(&ip_bytes(&network.network_address()));
        self.encode_uint(u64::from(network.prefix_len()));
    }
}
