// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Builder patterns for constructing test objects.

use oncora_core::NewUser;

use crate::common::fixtures::TEST_PASSWORD;

/// Builder for [`NewUser`] requests.
#[derive(Debug, Clone)]
pub struct UserBuilder {
    full_name: String,
    identification: String,
    password: String,
    email: Option<String>,
    phone: Option<String>,
}

impl UserBuilder {
    /// Starts a builder for the given identification.
    pub fn new(identification: impl Into<String>) -> Self {
        let identification = identification.into();
        Self {
            full_name: format!("User {identification}"),
            identification,
            password: TEST_PASSWORD.to_string(),
            email: None,
            phone: None,
        }
    }

    /// Sets the display name.
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Sets the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets the email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the phone number.
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Builds the request.
    pub fn build(self) -> NewUser {
        NewUser {
            full_name: self.full_name,
            identification: self.identification,
            password: self.password,
            email: self.email,
            phone: self.phone,
        }
    }
}
