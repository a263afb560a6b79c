use crate::assert_err;
use crate::data::DataError;

#[test]
fn test_assert_err_macro() {
    let unknown: Result<(), DataError> = Err(DataError::UnknownPack("poetry".to_string()));
    assert_err!(unknown);
    assert_err!(unknown, DataError::UnknownPack("poetry"));
    assert_err!(unknown, DataError::UnknownPack(name) if name.starts_with("poe"));

    let too_large: Result<(), DataError> = Err(DataError::FileTooLarge { max: 10 });
    assert_err!(too_large, DataError::FileTooLarge { max: 10 });
}
