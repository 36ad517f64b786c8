use mall_domain::id::{AddressId, UserId};

use crate::domain::repository::{AddressRepository, UserRepository};
use crate::domain::types::{Address, AddressBook, AddressFields, validate_address, validate_title};
use crate::error::UsersServiceError;

/// Load an address that `user_id` may modify.
///
/// Missing and deleted addresses are `AddressNotFound`; an active address of
/// another user is `Forbidden`.
async fn load_owned<A: AddressRepository>(
    repo: &A,
    user_id: UserId,
    id: AddressId,
) -> Result<Address, UsersServiceError> {
    let address = repo
        .find_by_id(id)
        .await?
        .filter(Address::is_active)
        .ok_or(UsersServiceError::AddressNotFound)?;
    if address.user_id != user_id {
        return Err(UsersServiceError::Forbidden);
    }
    Ok(address)
}

// ── ListAddresses ────────────────────────────────────────────────────────────

pub struct ListAddressesUseCase<U: UserRepository, A: AddressRepository> {
    pub users: U,
    pub addresses: A,
}

impl<U: UserRepository, A: AddressRepository> ListAddressesUseCase<U, A> {
    pub async fn execute(
        &self,
        user_id: UserId,
        limit: u64,
    ) -> Result<AddressBook, UsersServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(UsersServiceError::UserNotFound)?;
        let addresses = self.addresses.list_active(user_id).await?;
        Ok(AddressBook {
            user_id,
            default_address_id: user.default_address_id,
            limit,
            addresses,
        })
    }
}

// ── CreateAddress ────────────────────────────────────────────────────────────

pub struct CreateAddressUseCase<A: AddressRepository> {
    pub repo: A,
}

impl<A: AddressRepository> CreateAddressUseCase<A> {
    pub async fn execute(
        &self,
        user_id: UserId,
        fields: AddressFields,
        limit: u64,
    ) -> Result<Address, UsersServiceError> {
        validate_address(&fields).map_err(UsersServiceError::InvalidAddress)?;
        let address = self
            .repo
            .create_within_limit(user_id, &fields, limit)
            .await?
            .ok_or(UsersServiceError::AddressLimitExceeded)?;
        tracing::debug!(%user_id, address_id = %address.id, "address created");
        Ok(address)
    }
}

// ── UpdateAddress ────────────────────────────────────────────────────────────

pub struct UpdateAddressUseCase<A: AddressRepository> {
    pub repo: A,
}

impl<A: AddressRepository> UpdateAddressUseCase<A> {
    pub async fn execute(
        &self,
        user_id: UserId,
        id: AddressId,
        fields: AddressFields,
    ) -> Result<Address, UsersServiceError> {
        validate_address(&fields).map_err(UsersServiceError::InvalidAddress)?;
        load_owned(&self.repo, user_id, id).await?;
        // Deleted between the check and the update.
        self.repo
            .update(id, &fields)
            .await?
            .ok_or(UsersServiceError::AddressNotFound)
    }
}

// ── DeleteAddress ────────────────────────────────────────────────────────────

pub struct DeleteAddressUseCase<A: AddressRepository> {
    pub repo: A,
}

impl<A: AddressRepository> DeleteAddressUseCase<A> {
    pub async fn execute(&self, user_id: UserId, id: AddressId) -> Result<(), UsersServiceError> {
        load_owned(&self.repo, user_id, id).await?;
        self.repo.soft_delete(id, user_id).await
    }
}

// ── SetDefaultAddress ────────────────────────────────────────────────────────

pub struct SetDefaultAddressUseCase<A: AddressRepository> {
    pub repo: A,
}

impl<A: AddressRepository> SetDefaultAddressUseCase<A> {
    pub async fn execute(&self, user_id: UserId, id: AddressId) -> Result<(), UsersServiceError> {
        load_owned(&self.repo, user_id, id).await?;
        // Deleted between the check and the update.
        if !self.repo.set_default(user_id, id).await? {
            return Err(UsersServiceError::AddressNotFound);
        }
        Ok(())
    }
}

// ── RenameAddress ────────────────────────────────────────────────────────────

pub struct RenameAddressUseCase<A: AddressRepository> {
    pub repo: A,
}

impl<A: AddressRepository> RenameAddressUseCase<A> {
    /// Returns the stored (trimmed) title.
    pub async fn execute(
        &self,
        user_id: UserId,
        id: AddressId,
        title: &str,
    ) -> Result<String, UsersServiceError> {
        let title = title.trim();
        if !validate_title(title) {
            return Err(UsersServiceError::InvalidTitle);
        }
        load_owned(&self.repo, user_id, id).await?;
        if !self.repo.update_title(id, title).await? {
            return Err(UsersServiceError::AddressNotFound);
        }
        Ok(title.to_owned())
    }
}
