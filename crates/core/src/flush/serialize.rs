//! Line protocol
//!
//! One line per table entry, `name:value|unit\n`, where value is the integer
//! sum or the integer average. Entry order is unspecified.

use std::fmt::Write as _;

use bytes::{BufMut, BytesMut};

use crate::aggregation::MetricsTable;

const COLON: &[u8] = b":";
const PIPE: &[u8] = b"|";
const LBR: &[u8] = b"\n";

/// Append the serialized table to `out`. An empty table writes nothing.
pub fn write_table(table: &MetricsTable, out: &mut BytesMut) {
    for (key, value) in table.iter() {
        out.put_slice(key.name().as_bytes());
        out.put_slice(COLON);
        // Writing into BytesMut cannot fail.
        let _ = write!(out, "{}", value.value());
        out.put_slice(PIPE);
        out.put_slice(key.unit().as_bytes());
        out.put_slice(LBR);
    }
}

/// Serialize the table into a fresh `String`.
pub fn render(table: &MetricsTable) -> String {
    let mut out = BytesMut::new();
    write_table(table, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}
