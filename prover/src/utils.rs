use ark_bn254::Bn254;
use ark_groth16::{ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub fn save_proving_key(pk: &ProvingKey<Bn254>, path: &Path) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    pk.serialize_uncompressed(&mut file)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.flush()
}

pub fn save_verifying_key(vk: &VerifyingKey<Bn254>, path: &Path) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    vk.serialize_uncompressed(&mut file)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.flush()
}

pub fn load_proving_key(path: &Path) -> std::io::Result<ProvingKey<Bn254>> {
    let reader = BufReader::new(File::open(path)?);
    ProvingKey::<Bn254>::deserialize_uncompressed(reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

pub fn load_verifying_key(path: &Path) -> std::io::Result<VerifyingKey<Bn254>> {
    let reader = BufReader::new(File::open(path)?);
    VerifyingKey::<Bn254>::deserialize_uncompressed(reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
