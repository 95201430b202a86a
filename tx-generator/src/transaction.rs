use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest amount a generated record can carry (inclusive).
pub const MAX_AMOUNT: u8 = 100;

#[allow(clippy::module_name_repetitions)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionRecordType {
    Deposit,
    Withdrawal,
    Resolve,
    Chargeback,
    Dispute,
}

impl TransactionRecordType {
    pub const ALL: [TransactionRecordType; 5] = [
        TransactionRecordType::Deposit,
        TransactionRecordType::Withdrawal,
        TransactionRecordType::Resolve,
        TransactionRecordType::Chargeback,
        TransactionRecordType::Dispute,
    ];

    /// Disputes, resolves and chargebacks point at an earlier transaction,
    /// so they are the only types allowed to reuse a known id.
    #[must_use]
    pub fn refers_to_prior_tx(self) -> bool {
        !matches!(
            self,
            TransactionRecordType::Deposit | TransactionRecordType::Withdrawal
        )
    }
}

impl Distribution<TransactionRecordType> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TransactionRecordType {
        TransactionRecordType::ALL[rng.gen_range(0..TransactionRecordType::ALL.len())]
    }
}

/// One row of a generated fixture.
#[allow(clippy::module_name_repetitions)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRecord {
    #[serde(rename = "type")]
    pub transaction_type: TransactionRecordType,
    #[serde(rename = "client")]
    pub client_id: u16,
    #[serde(rename = "tx")]
    pub transaction_id: u32,
    pub amount: u8,
}

impl TransactionRecord {
    #[must_use]
    pub fn new(
        transaction_type: TransactionRecordType,
        client_id: u16,
        transaction_id: u32,
        amount: u8,
    ) -> Self {
        TransactionRecord {
            transaction_type,
            client_id,
            transaction_id,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use csv::{ReaderBuilder, Trim, WriterBuilder};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_refers_to_prior_tx() {
        assert!(!TransactionRecordType::Deposit.refers_to_prior_tx());
        assert!(!TransactionRecordType::Withdrawal.refers_to_prior_tx());
        assert!(TransactionRecordType::Resolve.refers_to_prior_tx());
        assert!(TransactionRecordType::Chargeback.refers_to_prior_tx());
        assert!(TransactionRecordType::Dispute.refers_to_prior_tx());
    }

    #[test]
    fn test_type_distribution_covers_all_variants() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<TransactionRecordType> =
            (0..1_000).map(|_| rng.gen::<TransactionRecordType>()).collect();
        assert_eq!(seen.len(), TransactionRecordType::ALL.len());
    }

    #[test]
    fn test_record_serializes_in_field_order() {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(vec![]);
        writer
            .serialize(TransactionRecord::new(
                TransactionRecordType::Chargeback,
                65_535,
                4_294_967_295,
                100,
            ))
            .unwrap();
        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(data, "chargeback,65535,4294967295,100\n");
    }

    #[test]
    fn test_record_deserializes_with_padded_header() {
        let data = "type,client,tx , amount\r\n  withdrawal , 2 ,  7,  42\r\n";
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(data.as_bytes());
        let records: Vec<TransactionRecord> =
            reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(
            records,
            vec![TransactionRecord::new(
                TransactionRecordType::Withdrawal,
                2,
                7,
                42
            )]
        );
    }

    #[test]
    fn test_amount_overflowing_u8_is_rejected() {
        let data = "type,client,tx,amount\ndeposit,1,1,256\n";
        let mut reader = ReaderBuilder::new().from_reader(data.as_bytes());
        let res: Result<Vec<TransactionRecord>, _> = reader.deserialize().collect();
        assert!(res.is_err());
    }
}
