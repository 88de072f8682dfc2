use rand::Rng;
use std::fs::File;
use std::io::Error;
use std::path::Path;

const BANKS: [&str; 4] = ["BCA", "BRI", "Mandiri", "CIMB"];

pub const SCRIPT_HEADER: [&str; 9] = [
    "op",
    "phone",
    "to",
    "name",
    "bank",
    "account",
    "amount",
    "note",
    "reference",
];

/// Writes a replay script with two wallets and `transfers` minimum-amount
/// transfers from the first to the second, funded by however many approved
/// maximum top-ups the transfer volume requires.
pub fn generate_transfer_script(path: &Path, transfers: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(SCRIPT_HEADER)?;
    wtr.write_record(["register", "08111111111", "", "Alice", "", "", "", "", "123456"])?;
    wtr.write_record(["register", "08222222222", "", "Bob", "", "", "", "", "123456"])?;

    // Each max top-up credits 9,998,800; each transfer costs 11,200.
    let mut rng = rand::thread_rng();
    let topups = (transfers * 11_200).div_ceil(9_998_800).max(1);
    for i in 0..topups {
        let proof = format!("proof-{i}");
        wtr.write_record([
            "topup",
            "08111111111",
            "",
            "Alice",
            BANKS[rng.gen_range(0..BANKS.len())],
            "1234567890",
            "10000000",
            "",
            proof.as_str(),
        ])?;
        wtr.write_record(["approve", "08111111111", "", "", "", "", "", "", ""])?;
    }

    for _ in 0..transfers {
        wtr.write_record([
            "send",
            "08111111111",
            "08222222222",
            "",
            "",
            "",
            "10000",
            "",
            "",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
