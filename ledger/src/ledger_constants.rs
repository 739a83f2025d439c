use rsopal_core::{epoch_v1_link, epoch_v2_link, Epoch, Epochs};

pub struct LedgerConstants {
    pub epochs: Epochs,
}

impl LedgerConstants {
    pub fn new() -> Self {
        let mut epochs = Epochs::new();
        epochs.add(Epoch::Epoch1, epoch_v1_link());
        epochs.add(Epoch::Epoch2, epoch_v2_link());
        Self { epochs }
    }

    pub fn unit_test() -> Self {
        Self::new()
    }
}

impl Default for LedgerConstants {
    fn default() -> Self {
        Self::new()
    }
}
