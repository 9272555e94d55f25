//! Field-by-field checks between a submitted machine and the provider's
//! answer.

use std::fmt::Debug;

use thiserror::Error;

use crate::client::operation_id_from_url;
use crate::models::{InstanceViewStatus, OperationStatus, Plan, VirtualMachine};

/// Raised when a provider answer does not match what was submitted.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    /// A field differs between request and response.
    #[error("{field} mismatch: expected {expected}, got {actual}")]
    Mismatch {
        /// Path of the field.
        field: String,
        /// Submitted value.
        expected: String,
        /// Returned value.
        actual: String,
    },
    /// A field the provider must fill in is absent.
    #[error("{field} is missing")]
    Missing {
        /// Path of the field.
        field: String,
    },
}

fn missing(field: &str) -> ValidationError {
    ValidationError::Missing {
        field: field.to_owned(),
    }
}

fn require<T>(field: &str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| missing(field))
}

pub(crate) fn expect_eq<T: Debug + PartialEq>(
    field: &str,
    expected: &T,
    actual: &T,
) -> Result<(), ValidationError> {
    if expected == actual {
        return Ok(());
    }
    Err(ValidationError::Mismatch {
        field: field.to_owned(),
        expected: format!("{expected:?}"),
        actual: format!("{actual:?}"),
    })
}

/// Compares two ids or regions, ignoring ASCII case.
pub(crate) fn expect_eq_ignore_case(
    field: &str,
    expected: &str,
    actual: &str,
) -> Result<(), ValidationError> {
    if expected.eq_ignore_ascii_case(actual) {
        return Ok(());
    }
    Err(ValidationError::Mismatch {
        field: field.to_owned(),
        expected: expected.to_owned(),
        actual: actual.to_owned(),
    })
}

/// Checks that the provider kept what was submitted.
///
/// The answer must carry a provisioning state, the submitted size, an OS
/// disk and the submitted availability set. When an OS disk was submitted,
/// its name, VHD and caching must come back unchanged. Every submitted data
/// disk must come back by name with a VHD, and with the same source image
/// when one was given. Plans are compared with [`validate_plan`].
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_vm(input: &VirtualMachine, output: &VirtualMachine) -> Result<(), ValidationError> {
    let state = require(
        "properties.provisioningState",
        output.properties.provisioning_state.as_deref(),
    )?;
    if state.is_empty() {
        return Err(missing("properties.provisioningState"));
    }
    expect_eq("hardwareProfile.vmSize", &input.vm_size(), &output.vm_size())?;
    let returned_os_disk = require("storageProfile.osDisk", output.os_disk())?;

    let returned_set = require("availabilitySet.id", output.availability_set_id())?;
    let submitted_set = require("submitted availabilitySet.id", input.availability_set_id())?;
    expect_eq_ignore_case("availabilitySet.id", submitted_set, returned_set)?;

    if let Some(submitted_os_disk) = input.os_disk() {
        expect_eq(
            "storageProfile.osDisk.name",
            &submitted_os_disk.name,
            &returned_os_disk.name,
        )?;
        expect_eq(
            "storageProfile.osDisk.vhd.uri",
            &submitted_os_disk.vhd.as_ref().and_then(|vhd| vhd.uri.as_ref()),
            &returned_os_disk.vhd.as_ref().and_then(|vhd| vhd.uri.as_ref()),
        )?;
        expect_eq(
            "storageProfile.osDisk.caching",
            &submitted_os_disk.caching,
            &returned_os_disk.caching,
        )?;
    }

    for submitted in input.data_disks() {
        let returned = output
            .data_disks()
            .iter()
            .find(|disk| disk.name == submitted.name)
            .ok_or_else(|| ValidationError::Missing {
                field: format!(
                    "storageProfile.dataDisks[{}]",
                    submitted.name.as_deref().unwrap_or_default()
                ),
            })?;
        require(
            "storageProfile.dataDisks[].vhd.uri",
            returned.vhd.as_ref().and_then(|vhd| vhd.uri.as_ref()),
        )?;
        if let Some(image_uri) = submitted.image.as_ref().and_then(|image| image.uri.as_ref()) {
            let returned_image = require(
                "storageProfile.dataDisks[].image.uri",
                returned.image.as_ref().and_then(|image| image.uri.as_ref()),
            )?;
            expect_eq("storageProfile.dataDisks[].image.uri", image_uri, returned_image)?;
        }
    }

    validate_plan(input.plan.as_ref(), output.plan.as_ref())
}

/// Checks that both plans are absent, or that name, publisher, product and
/// promotion code agree.
///
/// # Errors
///
/// Returns [`ValidationError::Mismatch`] on the first differing field.
pub fn validate_plan(input: Option<&Plan>, output: Option<&Plan>) -> Result<(), ValidationError> {
    let (Some(submitted), Some(returned)) = (input, output) else {
        return expect_eq("plan", &input, &output);
    };
    expect_eq("plan.name", &submitted.name, &returned.name)?;
    expect_eq("plan.publisher", &submitted.publisher, &returned.publisher)?;
    expect_eq("plan.product", &submitted.product, &returned.product)?;
    expect_eq(
        "plan.promotionCode",
        &submitted.promotion_code,
        &returned.promotion_code,
    )
}

fn has_code(status: &InstanceViewStatus) -> bool {
    status.code.as_deref().is_some_and(|code| !code.is_empty())
}

/// Checks the runtime view of a machine fetched with its instance view.
///
/// Some status must carry a code, at least one disk must be reported, the
/// submitted OS disk must appear by name, and the first disk's first status
/// must carry a display status, code and level.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_vm_instance_view(
    input: &VirtualMachine,
    output: &VirtualMachine,
) -> Result<(), ValidationError> {
    let view = require("instanceView", output.properties.instance_view.as_ref())?;
    if !view.statuses.iter().any(has_code) {
        return Err(missing("instanceView.statuses[].code"));
    }
    let first_disk = require("instanceView.disks", view.disks.first())?;

    if let Some(os_disk_name) = input.os_disk().and_then(|disk| disk.name.as_deref())
        && !view
            .disks
            .iter()
            .any(|disk| disk.name.as_deref() == Some(os_disk_name))
    {
        return Err(ValidationError::Missing {
            field: format!("instanceView.disks[{os_disk_name}]"),
        });
    }

    let first_status = require("instanceView.disks[0].statuses", first_disk.statuses.first())?;
    require(
        "instanceView.disks[0].statuses[0].displayStatus",
        first_status.display_status.as_ref(),
    )?;
    require(
        "instanceView.disks[0].statuses[0].code",
        first_status.code.as_ref(),
    )?;
    require(
        "instanceView.disks[0].statuses[0].level",
        first_status.level.as_ref(),
    )?;
    Ok(())
}

/// Checks an operation status against the URL it was read from: status and
/// start time must be set and the tracking id must equal the URL's last path
/// segment.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_lro_response(
    status: &OperationStatus,
    operation_url: &str,
) -> Result<(), ValidationError> {
    let expected_id = require("operation id in status URL", operation_id_from_url(operation_url))?;
    require("status", status.status.as_ref())?;
    require("startTime", status.start_time.as_ref())?;
    expect_eq(
        "trackingOperationId",
        &Some(expected_id),
        &status.tracking_operation_id(),
    )
}
