//! Basic usage example for the IPC wire codec.

use ipc_wire::{
    decode, decode_all, encode, encode_with, from_json, to_json, EncodeContext, TypeArrayParams,
    Value, WireType,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== IPC Wire Codec Example ===\n");

    // 1. Encode a few primitives
    println!("1. Encoding primitives...");
    for value in [
        Value::from(-1),
        Value::from(true),
        Value::from("ab"),
        Value::from(3.14),
    ] {
        let encoded = encode(&value)?;
        println!("   {:<24} -> {}", format!("{value:?}"), hex::encode(&encoded));
    }

    // 2. Nested map built from JSON
    println!("\n2. Encoding a record...");
    let record = from_json(&serde_json::json!({
        "id": 42,
        "tags": ["a", "b"],
        "ratio": -0.25,
        "nested": {"ok": true}
    }))?;
    let encoded = encode(&record)?;
    println!("   Encoded size: {} bytes", encoded.len());

    let decoded = decode(&encoded, 0)?;
    println!("   Consumed: {} bytes", decoded.consumed);
    println!("   Decoded: {}", to_json(&decoded.value));

    // 3. Typed arrays hoist the element tag
    println!("\n3. Comparing plain and typed arrays...");
    let ids = Value::array(["foo", "bar", "foobar1", "foobar2", "foobar3"]);
    let plain = encode(&ids)?;
    let typed = encode_with(
        &EncodeContext::for_type_array(TypeArrayParams::new(WireType::String)),
        &ids,
    )?;
    println!("   Plain array: {} bytes", plain.len());
    println!("   Typed array: {} bytes", typed.len());
    assert_eq!(decode_all(&typed)?, ids);

    // 4. Malformed input is rejected
    println!("\n4. Decoding a truncated buffer...");
    match decode(&encoded[..encoded.len() / 2], 0) {
        Ok(_) => println!("   unexpected success"),
        Err(e) => println!("   Error: {e}"),
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
