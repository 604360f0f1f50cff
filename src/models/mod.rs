pub mod account;

pub use account::{
    Account, AccountProfile, AccountUpdate, AvatarUpload, Deletion, DirectoryPage, LoginToken,
    NewAccount, NewRegistration, Registration, StatusMessage,
};
