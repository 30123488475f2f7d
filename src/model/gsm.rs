use std::path::{Path, PathBuf};

use hdf5::{File, H5Type};
use ndarray::aview0;
use thiserror::Error;

use super::Profile;
use crate::{constants::PhysicalConstants, equations::ADIABATIC_INDEX};

/// Errors that can be returned when writing a stellar model
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GsmError {
    /// Failed to create the output file.
    ///
    /// The first parameter is the file that failed to be created, the second parameter is the
    /// error the hdf5 crate returned.
    #[error("Could not create `{0}`")]
    HDF5CreateError(PathBuf, #[source] hdf5::Error),
    /// Failed to write an attribute or a dataset.
    ///
    /// The first parameter is the attribute or dataset that failed to be written. The second
    /// parameter is the error the hdf5 crate returned.
    #[error("Could not write `{0}` to model file")]
    HDF5DataWriteError(&'static str, #[source] hdf5::Error),
    /// The profile has fewer than two interior points, which is not a usable model.
    #[error("Profile has only {0} interior points")]
    TooShort(usize),
}

fn write_attr<T: H5Type>(file: &File, attr: &'static str, value: &T) -> Result<(), GsmError> {
    file.new_attr_builder()
        .with_data(aview0(value))
        .create(attr)
        .map(|_| ())
        .map_err(|err| GsmError::HDF5DataWriteError(attr, err))
}

fn write_dataset(file: &File, dataset: &'static str, data: &[f64]) -> Result<(), GsmError> {
    file.new_dataset_builder()
        .with_data(data)
        .create(dataset)
        .map(|_| ())
        .map_err(|err| GsmError::HDF5DataWriteError(dataset, err))
}

impl Profile {
    /// Write the interior of the profile as a GYRE stellar model HDF5 file.
    ///
    /// The layout follows the GSM
    /// [format](https://gyre.readthedocs.io/en/stable/ref-guide/stellar-models/gsm-file-format.html):
    /// the scalars `n`, `M_star`, `R_star` and `L_star` as attributes, and the datasets `r`, `M_r`,
    /// `L_r`, `P`, `T`, `rho`, `kap`, `eps`, `Gamma_1`, `N2` and `Omega_rot`. The model is
    /// non-rotating.
    pub fn write_gsm<P: AsRef<Path>>(
        &self,
        file: P,
        constants: &PhysicalConstants,
    ) -> Result<(), GsmError> {
        let n = self.interior_len();
        if n < 2 {
            return Err(GsmError::TooShort(n));
        }

        let output = &File::create(file.as_ref())
            .map_err(|err| GsmError::HDF5CreateError(file.as_ref().to_owned(), err))?;

        write_attr(output, "n", &n)?;
        write_attr(output, "M_star", &self.m_star())?;
        write_attr(output, "R_star", &self.r_star())?;
        write_attr(output, "L_star", &self.l_star())?;

        write_dataset(output, "r", &self.r_coord[..n])?;
        write_dataset(output, "M_r", &self.m_coord[..n])?;
        write_dataset(output, "L_r", &self.l[..n])?;
        write_dataset(output, "P", &self.p[..n])?;
        write_dataset(output, "T", &self.t[..n])?;
        write_dataset(output, "rho", &self.rho[..n])?;
        write_dataset(output, "kap", &self.kappa[..n])?;
        write_dataset(output, "eps", &self.epsilon[..n])?;
        write_dataset(output, "Gamma_1", &vec![ADIABATIC_INDEX; n])?;
        write_dataset(output, "N2", &self.brunt_vaisala(constants).to_vec())?;
        write_dataset(output, "Omega_rot", &vec![0.; n])?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_star;

    #[test]
    fn write_and_read_back() {
        let star = build_star(1.5e7, 1e18, 0.7, 0.28).unwrap();
        let path = std::env::temp_dir().join(format!("starbuild-{}.GSM", std::process::id()));

        star.write_gsm(&path, &PhysicalConstants::cgs()).unwrap();

        let input = File::open(&path).unwrap();
        let n: usize = input.attr("n").unwrap().read_scalar().unwrap();
        let radius: f64 = input.attr("R_star").unwrap().read_scalar().unwrap();
        let r = input.dataset("r").unwrap().read_1d::<f64>().unwrap();

        assert_eq!(n, star.interior_len());
        assert_eq!(radius, star.r_star());
        assert_eq!(r.len(), n);
        assert_eq!(r[0], star.r_coord()[0]);

        std::fs::remove_file(&path).unwrap();
    }
}
