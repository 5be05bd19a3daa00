use anyhow::{anyhow, Context, Result};
// Common library imports
use ring_signature::{
    constants::{
        DEFAULT_MESSAGE_PATH, DEFAULT_PRIVATE_KEY_PATH_PREFIX, DEFAULT_PUBLIC_KEY_PATH,
        DEFAULT_RSA_BITS, DEFAULT_SIGNATURE_PATH,
    },
    error::RingError,
    models::SignatureSummary,
    ring::{ring_sign, ring_verify, RingKeys, Role},
    rsa::generate_keypair,
    serialization::{
        decode_signature, format_public_keys, load_message, load_public_keys,
        load_signature_bytes, parse_secret_key, save_signature,
    },
};
// Logging
use log::{debug, error, info};
// CLI interaction
use dialoguer::{Input, Password, Select};
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Select mode: Sign, Verify or Generate keys
    let modes = &["Sign", "Verify", "Generate keys"];
    let mode_idx = Select::new()
        .with_prompt("Select operation mode")
        .items(modes)
        .default(0)
        .interact()?;

    match modes[mode_idx] {
        "Sign" => handle_sign()?,
        "Verify" => handle_verify()?,
        "Generate keys" => handle_keygen()?,
        _ => unreachable!(),
    }

    Ok(())
}

fn prompt_path(prompt: &str, default: &str) -> Result<PathBuf> {
    let path: String = Input::<String>::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(PathBuf::from(path))
}

// --- Sign Mode ---
fn handle_sign() -> Result<()> {
    info!("--- Sign Mode ---");

    // --- Load Inputs ---
    let key_path = prompt_path("Public key file (e1, n1, e2, n2)", DEFAULT_PUBLIC_KEY_PATH)?;
    let keys = load_public_keys(&key_path)?;
    let message_path = prompt_path("Message file", DEFAULT_MESSAGE_PATH)?;
    let message = load_message(&message_path)?;

    // --- Signer Choice ---
    let signer_input: String = Input::<String>::new()
        .with_prompt("Enter signer (1 or 2)")
        .interact_text()?;
    let signer: usize = signer_input
        .trim()
        .parse()
        .map_err(|_| RingError::InvalidRole(signer_input.trim().to_string()))?;
    let role = Role::try_from(signer)?;

    // The private scalar is requested and parsed but does not affect the signature
    let secret_input = Password::new()
        .with_prompt(format!("Enter private key (d) for user {}", role.number()))
        .interact()?;
    let secret = parse_secret_key(&secret_input)?;

    // --- Generate Ring Signature ---
    info!("Generating ring signature...");
    let ring_sig = ring_sign(&keys, signer, &secret, &message)
        .context("Failed to generate ring signature")?;
    info!("Ring signature generated successfully.");

    // --- Self-Verification ---
    info!("Verifying generated signature...");
    if !ring_verify(&keys, &ring_sig, &message) {
        error!("Self-verification FAILED! The generated signature is invalid.");
        return Err(anyhow!("Generated signature failed self-verification"));
    }
    info!("Self-verification successful.");

    // --- Write Signature ---
    let output_path = prompt_path("Signature output file", DEFAULT_SIGNATURE_PATH)?;
    save_signature(&output_path, &ring_sig)?;

    let json_output = serde_json::to_string_pretty(&SignatureSummary::from(&ring_sig))
        .context("Failed to serialize signature summary to JSON")?;
    println!("\n--- Generated Signature (JSON) ---");
    println!("{}", json_output);
    println!("--- End of Signature ---");
    println!("Output written to '{}'.", output_path.display());

    Ok(())
}

// --- Verify Mode ---
fn handle_verify() -> Result<()> {
    info!("--- Verify Mode ---");

    let key_path = prompt_path("Public key file (e1, n1, e2, n2)", DEFAULT_PUBLIC_KEY_PATH)?;
    let keys = load_public_keys(&key_path)?;
    let message_path = prompt_path("Message file", DEFAULT_MESSAGE_PATH)?;
    let message = load_message(&message_path)?;
    let signature_path = prompt_path("Signature file", DEFAULT_SIGNATURE_PATH)?;
    let signature_bytes = load_signature_bytes(&signature_path)?;

    info!("Parsing signature...");
    let ring_sig = match decode_signature(&signature_bytes) {
        Ok(sig) => sig,
        Err(e) => {
            // A malformed signature is reported as a failed verification, then as an error
            error!("Signature file is malformed: {:#}", e);
            println!("\nVerification Result: False");
            return Err(e.context(format!(
                "Malformed signature file '{}'",
                signature_path.display()
            )));
        }
    };
    debug!("Parsed signature: {:?}", ring_sig);

    info!("Verifying ring signature...");
    let verify_result = ring_verify(&keys, &ring_sig, &message);

    println!("\n--- Verification Result ---");
    println!(
        "Verification Result: {}",
        if verify_result { "True" } else { "False" }
    );
    println!("--- End of Verification ---");

    Ok(())
}

// --- Key Generation Mode ---
fn handle_keygen() -> Result<()> {
    info!("--- Key Generation Mode ---");

    let bits: usize = Input::<usize>::new()
        .with_prompt("Modulus bit length")
        .default(DEFAULT_RSA_BITS)
        .interact_text()?;
    let key_path = prompt_path("Public key output file", DEFAULT_PUBLIC_KEY_PATH)?;

    let mut rng = rand::thread_rng();
    let kp1 = generate_keypair(bits, &mut rng).context("Failed to generate key pair 1")?;
    let kp2 = generate_keypair(bits, &mut rng).context("Failed to generate key pair 2")?;
    let keys = RingKeys::new(kp1.public, kp2.public);

    write_file(&key_path, format_public_keys(&keys).as_bytes())?;
    for (party, secret) in [(1, &kp1.secret), (2, &kp2.secret)] {
        let secret_path = PathBuf::from(format!("{}{}.txt", DEFAULT_PRIVATE_KEY_PATH_PREFIX, party));
        write_file(&secret_path, format!("{}\n", secret.d).as_bytes())?;
        println!(
            "Private key for user {} written to '{}'.",
            party,
            secret_path.display()
        );
    }
    println!("Public keys written to '{}'.", key_path.display());

    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("Failed to write file '{}'", path.display()))
}
