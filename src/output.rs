use std::fmt::Write as _;

use levelbook::Front;

/// Format one front line into `buf` (cleared first), newline-terminated.
///
/// TSV columns: seq, amount, buy price, buy amount, sell price, sell amount,
/// spread.
pub fn format_front(buf: &mut String, seq: u64, amount: f64, front: &Front, json_mode: bool) {
    buf.clear();

    if json_mode {
        // Manual JSON construction to avoid serde_json::to_string allocation overhead.
        buf.push_str("{\"seq\":");
        push_u64(buf, seq);
        buf.push_str(",\"amount\":");
        format_f64(buf, amount);
        buf.push_str(",\"buy\":{\"price\":");
        format_f64(buf, front.buy.price);
        buf.push_str(",\"amount\":");
        format_f64(buf, front.buy.amount);
        buf.push_str("},\"sell\":{\"price\":");
        format_f64(buf, front.sell.price);
        buf.push_str(",\"amount\":");
        format_f64(buf, front.sell.amount);
        buf.push_str("},\"spread\":");
        format_f64(buf, front.spread());
        buf.push('}');
    } else {
        push_u64(buf, seq);
        for val in [
            amount,
            front.buy.price,
            front.buy.amount,
            front.sell.price,
            front.sell.amount,
            front.spread(),
        ] {
            buf.push('\t');
            format_f64(buf, val);
        }
    }

    buf.push('\n');
}

/// Fast f64 formatting via `ryu`.
fn format_f64(buf: &mut String, val: f64) {
    let mut b = ryu::Buffer::new();
    buf.push_str(b.format(val));
}

fn push_u64(buf: &mut String, val: u64) {
    // Writing into a String cannot fail.
    let _ = write!(buf, "{val}");
}
