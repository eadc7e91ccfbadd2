//! Decodificadores por forma: texto crudo → valor intermedio.
use std::str::FromStr;

use ada_domain::{Balance, Quantity, TxIn, UtxoSet};
use serde_json::{Map, Number, Value};

use crate::parse::shapes::Shape;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Decoded {
    Structured { value: Value, notes: Vec<String> },
    Utxos(UtxoSet),
    Integer(Quantity),
    Token(String),
    Text(String),
}

pub(crate) fn decode(shape: Shape, raw: &str) -> Result<Decoded, String> {
    match shape {
        Shape::StrictJson => strict_json(raw),
        Shape::BannerJson => banner_json(raw),
        Shape::KeyValueLines => key_value_lines(raw),
        Shape::UtxoTable => utxo_table(raw),
        Shape::LeadingInteger => leading_integer(raw),
        Shape::TrailingInteger => trailing_integer(raw),
        Shape::SingleToken => single_token(raw),
        Shape::Text => Ok(Decoded::Text(raw.to_string())),
    }
}

fn strict_json(raw: &str) -> Result<Decoded, String> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| format!("strict json: {e}"))?;
    Ok(Decoded::Structured { value, notes: Vec::new() })
}

fn is_json_start(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with('{') || t.starts_with('[')
}

fn is_json_end(line: &str) -> bool {
    let t = line.trim_end();
    t.ends_with('}') || t.ends_with(']')
}

/// Bloque JSON entre la primera línea que abre y la última que cierra; el
/// resto de líneas no vacías se conserva como notas.
fn banner_json(raw: &str) -> Result<Decoded, String> {
    let lines: Vec<&str> = raw.lines().collect();
    let start = lines.iter().position(|l| is_json_start(l)).ok_or("banner json: no json block")?;
    let end = lines.iter().rposition(|l| is_json_end(l)).filter(|e| *e >= start).ok_or("banner json: unterminated json block")?;
    let block = lines[start..=end].join("\n");
    let value: Value = serde_json::from_str(&block).map_err(|e| format!("banner json: {e}"))?;
    let notes = lines[..start].iter()
                              .chain(lines[end + 1..].iter())
                              .map(|l| l.trim())
                              .filter(|l| !l.is_empty())
                              .map(str::to_string)
                              .collect();
    Ok(Decoded::Structured { value, notes })
}

fn unquote(s: &str) -> &str {
    s.trim().trim_end_matches(',').trim().trim_matches('"')
}

fn is_integer_literal(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

fn scalar(raw: &str) -> Value {
    let v = raw.trim().trim_end_matches(',').trim();
    if is_integer_literal(v) {
        if let Ok(n) = Number::from_str(v) {
            return Value::Number(n);
        }
    }
    match v {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(unquote(v).to_string()),
    }
}

fn key_value_lines(raw: &str) -> Result<Decoded, String> {
    let mut map = Map::new();
    let mut notes = Vec::new();
    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let split = line.find(|c: char| c == ':' || c == '=').map(|i| (&line[..i], &line[i + 1..]));
        match split {
            Some((k, v)) if !unquote(k).is_empty() && !unquote(k).contains(' ') => {
                map.insert(unquote(k).to_string(), scalar(v));
            }
            _ => notes.push(line.to_string()),
        }
    }
    if map.is_empty() {
        return Err("key/value: no pairs found".into());
    }
    Ok(Decoded::Structured { value: Value::Object(map),
                             notes })
}

/// `<hash> <ix> <n> lovelace [+ <n> <policy>[.<asset>]]* [+ TxOutDatum...]`
fn utxo_table(raw: &str) -> Result<Decoded, String> {
    let mut lines = raw.lines().map(str::trim).filter(|l| !l.is_empty());
    let header = lines.next().ok_or("utxo table: empty output")?;
    if !(header.contains("TxHash") && header.contains("TxIx")) {
        return Err("utxo table: missing TxHash/TxIx header".into());
    }
    let mut set = UtxoSet::new();
    for line in lines {
        if line.chars().all(|c| c == '-') {
            continue;
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 4 || cols[3] != "lovelace" {
            return Err(format!("utxo table: unexpected row '{line}'"));
        }
        let tx_in: TxIn = format!("{}#{}", cols[0], cols[1]).parse().map_err(|e| format!("utxo table: {e}"))?;
        let lovelace: Quantity = cols[2].parse().map_err(|e| format!("utxo table: {e}"))?;
        let mut balance = Balance::lovelace(lovelace);
        let mut rest = &cols[4..];
        while let Some((&"+", tail)) = rest.split_first() {
            match tail {
                [amount, asset, more @ ..] if is_integer_literal(amount) => {
                    let qty: Quantity = amount.parse().map_err(|e| format!("utxo table: {e}"))?;
                    let (policy, name) = asset.split_once('.').unwrap_or((*asset, ""));
                    balance.add_asset(policy, name, qty);
                    rest = more;
                }
                // `+ TxOutDatumNone` y variantes cierran la fila
                _ => break,
            }
        }
        set.insert(tx_in, balance);
    }
    Ok(Decoded::Utxos(set))
}

fn leading_integer(raw: &str) -> Result<Decoded, String> {
    let first = raw.split_whitespace().next().ok_or("leading integer: empty output")?;
    if !is_integer_literal(first) {
        return Err(format!("leading integer: '{first}' is not an integer"));
    }
    let q: Quantity = first.parse().map_err(|e| format!("leading integer: {e}"))?;
    Ok(Decoded::Integer(q))
}

fn trailing_integer(raw: &str) -> Result<Decoded, String> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    match tokens.as_slice() {
        [label, amount] if !is_integer_literal(label) && is_integer_literal(amount) => {
            let q: Quantity = amount.parse().map_err(|e| format!("trailing integer: {e}"))?;
            Ok(Decoded::Integer(q))
        }
        _ => Err(format!("trailing integer: expected '<label> <integer>', got {} tokens", tokens.len())),
    }
}

fn single_token(raw: &str) -> Result<Decoded, String> {
    let mut it = raw.split_whitespace();
    match (it.next(), it.next()) {
        (Some(tok), None) => Ok(Decoded::Token(tok.to_string())),
        (None, _) => Err("single token: empty output".into()),
        _ => Err("single token: more than one token".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: &str = "4e3a6e7fdcb0d0efa17bf79c13aed2b4cb9baf37fb1aa2e39553d5bd720c5c99";

    #[test]
    fn banner_json_keeps_notes() {
        let raw = "✓ The operational certificate counter agrees with the node protocol state counter\n\
                   ✓ Operational certificate's kes period is within the correct KES period interval\n\
                   {\n  \"qKesCurrentKesPeriod\": 404\n}\n";
        match banner_json(raw).unwrap() {
            Decoded::Structured { value, notes } => {
                assert_eq!(value["qKesCurrentKesPeriod"], 404);
                assert_eq!(notes.len(), 2);
                assert!(notes[0].starts_with('✓'));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn key_value_numbers_stay_exact() {
        match key_value_lines("slot: 99999999999999999999\nera: Babbage\nsome note line").unwrap() {
            Decoded::Structured { value, notes } => {
                assert_eq!(value["slot"].to_string(), "99999999999999999999");
                assert_eq!(value["era"], "Babbage");
                assert_eq!(notes, vec!["some note line".to_string()]);
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn legacy_table_with_tokens() {
        let raw = format!("                           TxHash                                 TxIx        Amount\n\
                           --------------------------------------------------------------------------------------\n\
                           {H}     0        1000000 lovelace + TxOutDatumNone\n\
                           {H}     1        5000000 lovelace + 10 a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c235.484f534b59 + TxOutDatumNone\n");
        let Decoded::Utxos(set) = utxo_table(&raw).unwrap() else { panic!("esperaba utxos") };
        assert_eq!(set.len(), 2);
        let total = set.total();
        assert_eq!(total.lovelace, Quantity::from(6_000_000u64));
        assert_eq!(total.asset("a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c235", "484f534b59"),
                   Some(&Quantity::from(10u64)));
    }

    #[test]
    fn fee_and_tokens() {
        assert_eq!(leading_integer("171397 Lovelace\n").unwrap(), Decoded::Integer(Quantity::from(171_397u64)));
        assert!(leading_integer("Lovelace 171397").is_err());
        assert_eq!(single_token(&format!("{H}\n")).unwrap(), Decoded::Token(H.to_string()));
        assert!(single_token("two tokens").is_err());
    }

    #[test]
    fn labelled_amounts() {
        assert_eq!(trailing_integer("Coin 978370\n").unwrap(), Decoded::Integer(Quantity::from(978_370u64)));
        assert_eq!(trailing_integer("Lovelace 1081810").unwrap(), Decoded::Integer(Quantity::from(1_081_810u64)));
        assert!(trailing_integer("978370 Lovelace").is_err());
        assert!(trailing_integer("Coin 1.5").is_err());
        assert!(trailing_integer("Coin 1 extra").is_err());
    }
}
