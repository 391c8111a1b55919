//! Walk through every coder with one injected error each
//!
//! Run with: cargo run --example walkthrough -p ecc-core
//!
//! Settings come from `EccConfig::load()`, so an `ecc.yaml` in the current
//! directory (or `ECC_CONFIG`) changes the block code and encoder used.

use ecc_core::bits::bits_to_string;
use ecc_core::prelude::*;

fn main() {
    let config = match EccConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config error: {}", e);
            std::process::exit(1);
        }
    };
    ecc_core::logging::init_logging(&config.logging);
    let locale = config.locale;

    // Hamming(7,4), flip position 5
    println!("== Hamming(7,4) ==");
    let data = [1, 0, 1, 1];
    let mut block = hamming_encode(&data);
    println!("data     {}", bits_to_string(&data));
    println!("codeword {}", bits_to_string(&block));
    block[4] ^= 1;
    let decoded = hamming_decode(&block);
    println!("received {}", bits_to_string(&block));
    println!(
        "syndrome {} -> corrected {:?}, data {}\n",
        decoded.syndrome,
        decoded.corrected_index,
        bits_to_string(&decoded.data_bits)
    );

    // SECDED(8,4), every classification
    println!("== SECDED(8,4) ==");
    let clean = secded_encode(&data);
    let scenarios: [(&str, &[usize]); 4] = [
        ("clean", &[]),
        ("overall parity bit", &[7]),
        ("position 3", &[2]),
        ("positions 3 and 6", &[2, 5]),
    ];
    for (label, flips) in scenarios {
        let mut received = clean.clone();
        for &i in flips {
            received[i] ^= 1;
        }
        let result = secded_decode(&received);
        println!(
            "{:<20} {} -> [{:?}] {}",
            label,
            bits_to_string(&received),
            result.status.severity(),
            status_message(&result.status, locale)
        );
    }
    println!();

    // Configured block code over a text message
    let framer = BlockFramer::new(config.block_code());
    let encoded = framer.encode_text("1011 0011 1");
    let mut stream = encoded.flatten();
    if let Some(bit) = stream.get_mut(1) {
        *bit ^= 1;
    }
    let framed = framer.decode(&stream, encoded.pad);
    println!("== {} framing ==", framer.code().name());
    println!(
        "{} blocks, {} corrected, {} untrusted, data {}\n",
        framed.blocks.len(),
        framed.corrected_blocks(),
        framed.untrusted_blocks(),
        bits_to_string(&framed.data_bits)
    );

    // Convolutional code + Viterbi
    let encoder_config = match config.encoder_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("encoder config error: {}", e);
            std::process::exit(1);
        }
    };
    println!("== {} ==", encoder_config);
    let input = [1, 0, 1, 1];
    let encoder = ConvolutionalEncoder::new(encoder_config.clone());
    for step in encoder.simulate(&input) {
        println!(
            "step {} in={} regs {} -> {} out={}{}",
            step.step_index,
            step.input_bit,
            bits_to_string(&step.register_state_before),
            bits_to_string(&step.register_state_after),
            bits_to_string(&step.encoded_bits),
            if step.is_flush(input.len()) { " (flush)" } else { "" }
        );
    }

    let mut received = encoder.encode(&input);
    received[1] ^= 1;
    match ViterbiDecoder::new(encoder_config).decode(&received) {
        Ok(result) => {
            println!("received {}", bits_to_string(&received));
            println!("survivor path {:?}", result.survivor_path);
            println!(
                "decoded {} (path metric {})",
                bits_to_string(&result.decoded_bits),
                result.final_metric()
            );
        }
        Err(e) => eprintln!("viterbi failed: {}", e),
    }
}
